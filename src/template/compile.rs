use serde_json::Value;

use crate::error::TemplateError;
use crate::scope::Scope;

use super::context::{Context, ContextScanner};
use super::escape::escape_in;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Escape {
    None,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable {
        path: Vec<String>,
        raw: String,
        context: Context,
    },
}

/// A parsed template, reusable across scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    key: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `input`; `key` names the field in errors.
    ///
    /// # Errors
    ///
    /// Returns an error for an unterminated or malformed placeholder.
    pub fn compile(key: &str, input: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut scanner = ContextScanner::new();
        let mut rest = input;

        loop {
            let Some(start) = rest.find(OPEN) else {
                push_literal(&mut segments, &mut scanner, rest);
                break;
            };
            let (before, after_start) = rest.split_at(start);
            push_literal(&mut segments, &mut scanner, before);
            let offset = input.len().saturating_sub(after_start.len());
            let after = after_start.get(OPEN.len()..).unwrap_or_default();
            let Some(end) = after.find(CLOSE) else {
                return Err(TemplateError::Unterminated {
                    key: key.to_owned(),
                    offset,
                });
            };
            let (inner, after_end) = after.split_at(end);
            let path = parse_path(inner).ok_or_else(|| TemplateError::InvalidPlaceholder {
                key: key.to_owned(),
                placeholder: inner.trim().to_owned(),
                offset,
            })?;
            segments.push(Segment::Variable {
                path,
                raw: inner.trim().to_owned(),
                context: scanner.context(),
            });
            scanner.after_value();
            rest = after_end.get(CLOSE.len()..).unwrap_or_default();
        }

        Ok(Self {
            key: key.to_owned(),
            segments,
        })
    }

    pub(super) fn render(&self, scope: &Scope, escape: Escape) -> Result<String, TemplateError> {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Variable { path, raw, context } => {
                    let value =
                        scope
                            .lookup(path)
                            .ok_or_else(|| TemplateError::MissingVariable {
                                key: self.key.clone(),
                                path: raw.clone(),
                            })?;
                    let text = value_text(value);
                    match escape {
                        Escape::None => output.push_str(&text),
                        Escape::Html => output.push_str(&escape_in(*context, value, &text)),
                    }
                }
            }
        }
        Ok(output)
    }

    /// Rendering without escaping, as the text templater does.
    ///
    /// # Errors
    ///
    /// Returns an error when a referenced variable is missing from `scope`.
    pub fn render_text(&self, scope: &Scope) -> Result<String, TemplateError> {
        self.render(scope, Escape::None)
    }
}

fn push_literal(segments: &mut Vec<Segment>, scanner: &mut ContextScanner, text: &str) {
    if !text.is_empty() {
        scanner.feed(text);
        segments.push(Segment::Literal(text.to_owned()));
    }
}

fn parse_path(inner: &str) -> Option<Vec<String>> {
    let trimmed = inner.trim();
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    let mut path = Vec::new();
    for segment in trimmed.split('.') {
        let valid = !segment.is_empty()
            && segment
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return None;
        }
        path.push(segment.to_owned());
    }
    Some(path)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
