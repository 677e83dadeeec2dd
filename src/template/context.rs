//! Markup context tracking for the html templater.
//!
//! Only literal template text moves the scanner; interpolated values are
//! escaped for the context they land in and never change it, except that a
//! value at the start of a URL attribute counts as its first character.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UrlPart {
    Start,
    Path,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AttrKind {
    Plain,
    Url(UrlPart),
    Script,
    Style,
}

impl AttrKind {
    const fn after_char(self, ch: char) -> Self {
        match self {
            Self::Url(UrlPart::Start | UrlPart::Path) if matches!(ch, '?' | '#') => {
                Self::Url(UrlPart::Query)
            }
            Self::Url(UrlPart::Start) => Self::Url(UrlPart::Path),
            Self::Url(UrlPart::Path | UrlPart::Query) | Self::Plain | Self::Script | Self::Style => {
                self
            }
        }
    }

    const fn after_value(self) -> Self {
        match self {
            Self::Url(UrlPart::Start) => Self::Url(UrlPart::Path),
            Self::Url(UrlPart::Path | UrlPart::Query) | Self::Plain | Self::Script | Self::Style => {
                self
            }
        }
    }
}

/// Where an interpolated value lands in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Context {
    Text,
    Tag,
    Attr { kind: AttrKind, quoted: bool },
    Script,
    ScriptString,
    Style,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Plain,
    Script,
    Style,
}

impl Element {
    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("script") {
            Self::Script
        } else if name.eq_ignore_ascii_case("style") {
            Self::Style
        } else {
            Self::Plain
        }
    }

    const fn content(self) -> State {
        match self {
            Self::Plain => State::Text,
            Self::Script => State::Script,
            Self::Style => State::Style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Text,
    Comment,
    Tag {
        element: Element,
    },
    AttrName {
        element: Element,
        name: String,
    },
    AfterAttrName {
        element: Element,
        kind: AttrKind,
    },
    BeforeValue {
        element: Element,
        kind: AttrKind,
    },
    Value {
        element: Element,
        kind: AttrKind,
        quote: Option<char>,
    },
    Script,
    ScriptString(char),
    Style,
}

const URL_ATTRIBUTES: &[&str] = &[
    "action",
    "archive",
    "background",
    "cite",
    "classid",
    "codebase",
    "data",
    "formaction",
    "href",
    "icon",
    "longdesc",
    "manifest",
    "poster",
    "profile",
    "usemap",
    "xmlns",
];

fn attr_kind(name: &str) -> AttrKind {
    let name = name.to_ascii_lowercase();
    let name = name.strip_prefix("data-").unwrap_or(&name);
    if name.starts_with("on") {
        AttrKind::Script
    } else if name == "style" {
        AttrKind::Style
    } else if URL_ATTRIBUTES.contains(&name)
        || name.contains("src")
        || name.contains("uri")
        || name.contains("url")
    {
        AttrKind::Url(UrlPart::Start)
    } else {
        AttrKind::Plain
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn closes_element(rest: &str, name: &str) -> bool {
    rest.strip_prefix("</")
        .is_some_and(|tail| starts_with_ignore_case(tail, name))
}

/// Walks literal markup and reports the context at each placeholder.
#[derive(Debug, Clone)]
pub(super) struct ContextScanner {
    state: State,
}

impl ContextScanner {
    pub(super) const fn new() -> Self {
        Self { state: State::Text }
    }

    pub(super) const fn context(&self) -> Context {
        match &self.state {
            State::Text => Context::Text,
            State::Comment => Context::Comment,
            State::Tag { .. } | State::AttrName { .. } | State::AfterAttrName { .. } => {
                Context::Tag
            }
            State::BeforeValue { kind, .. } => Context::Attr {
                kind: *kind,
                quoted: false,
            },
            State::Value { kind, quote, .. } => Context::Attr {
                kind: *kind,
                quoted: quote.is_some(),
            },
            State::Script => Context::Script,
            State::ScriptString(_) => Context::ScriptString,
            State::Style => Context::Style,
        }
    }

    /// Accounts for a value interpolated at the current position.
    pub(super) fn after_value(&mut self) {
        self.state = match std::mem::replace(&mut self.state, State::Text) {
            State::BeforeValue { element, kind } => State::Value {
                element,
                kind: kind.after_value(),
                quote: None,
            },
            State::Value {
                element,
                kind,
                quote,
            } => State::Value {
                element,
                kind: kind.after_value(),
                quote,
            },
            unchanged @ (State::Text
            | State::Comment
            | State::Tag { .. }
            | State::AttrName { .. }
            | State::AfterAttrName { .. }
            | State::Script
            | State::ScriptString(_)
            | State::Style) => unchanged,
        };
    }

    pub(super) fn feed(&mut self, text: &str) {
        let mut rest = text;
        while let Some(ch) = rest.chars().next() {
            let consumed = self.step(rest, ch);
            rest = rest.get(consumed..).unwrap_or_default();
        }
    }

    fn step(&mut self, rest: &str, ch: char) -> usize {
        let width = ch.len_utf8();
        let (next, consumed) = match std::mem::replace(&mut self.state, State::Text) {
            State::Text => text_step(rest, ch, width),
            State::Comment => match rest.strip_prefix("-->") {
                Some(_) => (State::Text, 3),
                None => (State::Comment, width),
            },
            State::Tag { element } => match ch {
                '>' => (element.content(), width),
                '/' => (State::Tag { element }, width),
                other if other.is_whitespace() => (State::Tag { element }, width),
                other => (
                    State::AttrName {
                        element,
                        name: other.to_string(),
                    },
                    width,
                ),
            },
            State::AttrName { element, mut name } => match ch {
                '=' => (
                    State::BeforeValue {
                        element,
                        kind: attr_kind(&name),
                    },
                    width,
                ),
                '>' => (element.content(), width),
                '/' => (State::Tag { element }, width),
                other if other.is_whitespace() => (
                    State::AfterAttrName {
                        element,
                        kind: attr_kind(&name),
                    },
                    width,
                ),
                other => {
                    name.push(other);
                    (State::AttrName { element, name }, width)
                }
            },
            State::AfterAttrName { element, kind } => match ch {
                '=' => (State::BeforeValue { element, kind }, width),
                '>' => (element.content(), width),
                '/' => (State::Tag { element }, width),
                other if other.is_whitespace() => (State::AfterAttrName { element, kind }, width),
                other => (
                    State::AttrName {
                        element,
                        name: other.to_string(),
                    },
                    width,
                ),
            },
            State::BeforeValue { element, kind } => match ch {
                '"' | '\'' => (
                    State::Value {
                        element,
                        kind,
                        quote: Some(ch),
                    },
                    width,
                ),
                '>' => (element.content(), width),
                other if other.is_whitespace() => (State::BeforeValue { element, kind }, width),
                other => (
                    State::Value {
                        element,
                        kind: kind.after_char(other),
                        quote: None,
                    },
                    width,
                ),
            },
            State::Value {
                element,
                kind,
                quote,
            } => value_step(element, kind, quote, ch, width),
            State::Script => {
                if closes_element(rest, "script") {
                    (State::Tag { element: Element::Plain }, 2)
                } else if matches!(ch, '"' | '\'' | '`') {
                    (State::ScriptString(ch), width)
                } else {
                    (State::Script, width)
                }
            }
            State::ScriptString(quote) => {
                if closes_element(rest, "script") {
                    (State::Tag { element: Element::Plain }, 2)
                } else if ch == '\\' {
                    let escaped = rest
                        .get(width..)
                        .and_then(|tail| tail.chars().next())
                        .map_or(0, char::len_utf8);
                    (State::ScriptString(quote), width.saturating_add(escaped))
                } else if ch == quote {
                    (State::Script, width)
                } else {
                    (State::ScriptString(quote), width)
                }
            }
            State::Style => {
                if closes_element(rest, "style") {
                    (State::Tag { element: Element::Plain }, 2)
                } else {
                    (State::Style, width)
                }
            }
        };
        self.state = next;
        consumed
    }
}

fn text_step(rest: &str, ch: char, width: usize) -> (State, usize) {
    if ch != '<' {
        return (State::Text, width);
    }
    if rest.starts_with("<!--") {
        return (State::Comment, 4);
    }
    let tail = rest.get(1..).unwrap_or_default();
    if tail.starts_with('/') {
        return (State::Tag { element: Element::Plain }, 2);
    }
    let name_len = tail
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tail.len());
    match tail.get(..name_len) {
        Some(name) if tail.starts_with(|c: char| c.is_ascii_alphabetic()) => (
            State::Tag {
                element: Element::from_name(name),
            },
            name_len.saturating_add(1),
        ),
        Some(_) | None => (State::Text, width),
    }
}

fn value_step(
    element: Element,
    kind: AttrKind,
    quote: Option<char>,
    ch: char,
    width: usize,
) -> (State, usize) {
    match quote {
        Some(q) if ch == q => (State::Tag { element }, width),
        None if ch.is_whitespace() => (State::Tag { element }, width),
        None if ch == '>' => (element.content(), width),
        Some(_) | None => (
            State::Value {
                element,
                kind: kind.after_char(ch),
                quote,
            },
            width,
        ),
    }
}
