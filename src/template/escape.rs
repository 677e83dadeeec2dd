use serde_json::Value;

use super::context::{AttrKind, Context, UrlPart};

/// Stands in for a URL whose scheme could run code.
const BLOCKED_URL: &str = "about:invalid#blocked";
/// Stands in for a value that cannot safely become an attribute name.
const BLOCKED_NAME: &str = "blocked";

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Escapes an interpolated value for the markup context it lands in.
pub(super) fn escape_in(context: Context, value: &Value, text: &str) -> String {
    match context {
        Context::Text => escape_html(text),
        Context::Tag => filter_attr_name(text),
        Context::Attr { kind, quoted } => {
            let inner = match kind {
                AttrKind::Plain => text.to_owned(),
                AttrKind::Url(UrlPart::Start) => normalize_url(filter_url(text)),
                AttrKind::Url(UrlPart::Path) => normalize_url(text),
                AttrKind::Url(UrlPart::Query) => escape_query(text),
                AttrKind::Script => escape_js_value(value),
                AttrKind::Style => escape_css(text),
            };
            if quoted {
                escape_html(&inner)
            } else {
                escape_html_unquoted(&inner)
            }
        }
        Context::Script => escape_js_value(value),
        Context::ScriptString => escape_js_string(text),
        Context::Style => escape_css(text),
        Context::Comment => String::new(),
    }
}

/// Entity-escapes text for safe inclusion in markup.
pub(super) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        push_html_char(&mut escaped, ch);
    }
    escaped
}

fn push_html_char(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&#34;"),
        '\'' => out.push_str("&#39;"),
        '\0' => out.push('\u{FFFD}'),
        other => out.push(other),
    }
}

/// Unquoted attribute values also end at whitespace, `=`, and backticks.
fn escape_html_unquoted(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_whitespace() || matches!(ch, '=' | '`') {
            escaped.push_str("&#");
            escaped.push_str(&u32::from(ch).to_string());
            escaped.push(';');
        } else {
            push_html_char(&mut escaped, ch);
        }
    }
    escaped
}

fn filter_attr_name(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let plain = !lower.is_empty()
        && lower
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        && !lower.starts_with("on")
        && lower != "style";
    if plain {
        lower
    } else {
        BLOCKED_NAME.to_owned()
    }
}

fn filter_url(input: &str) -> &str {
    match input.split_once(':') {
        Some((scheme, _))
            if !scheme.contains(|ch| matches!(ch, '/' | '?' | '#'))
                && !SAFE_SCHEMES
                    .iter()
                    .any(|safe| scheme.eq_ignore_ascii_case(safe)) =>
        {
            BLOCKED_URL
        }
        Some(_) | None => input,
    }
}

/// Percent-encodes bytes that may not appear in a URL, keeping its structure.
fn normalize_url(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~:/?#[]@!$&'()*+,;=%".contains(&byte) {
            out.push(char::from(byte));
        } else {
            push_percent(&mut out, byte);
        }
    }
    out
}

/// Percent-encodes everything but unreserved bytes.
fn escape_query(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            out.push(char::from(byte));
        } else {
            push_percent(&mut out, byte);
        }
    }
    out
}

fn push_percent(out: &mut String, byte: u8) {
    out.push('%');
    out.push(hex_digit(u32::from(byte >> 4)).to_ascii_uppercase());
    out.push(hex_digit(u32::from(byte & 0x0f)).to_ascii_uppercase());
}

fn hex_digit(nibble: u32) -> char {
    char::from_digit(nibble & 0x0f, 16).unwrap_or('0')
}

fn push_js_unicode(out: &mut String, ch: char) {
    let code = u32::from(ch);
    out.push_str("\\u");
    for shift in [12, 8, 4, 0] {
        out.push(hex_digit(code >> shift));
    }
}

/// Renders the value as a JSON literal that cannot close the script.
fn escape_js_value(value: &Value) -> String {
    let json = value.to_string();
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' | '>' | '&' | '\'' | '\u{2028}' | '\u{2029}' => push_js_unicode(&mut out, ch),
            other => out.push(other),
        }
    }
    out
}

fn escape_js_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '/' => out.push_str("\\/"),
            '"' | '\'' | '`' | '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => {
                push_js_unicode(&mut out, ch);
            }
            control if control.is_control() && u32::from(control) < 0x80 => {
                push_js_unicode(&mut out, control);
            }
            other => out.push(other),
        }
    }
    out
}

/// CSS hex escapes; a space terminates an escape that a hex digit follows.
fn escape_css(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            continue;
        }
        out.push('\\');
        let code = format!("{:x}", u32::from(ch));
        out.push_str(&code);
        if chars
            .peek()
            .is_some_and(|next| next.is_ascii_hexdigit() || next.is_whitespace())
        {
            out.push(' ');
        }
    }
    out
}
