use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ConfigError, ExtractError, ValidationError};
use crate::scope::Vars;
use crate::transport::ResponseParts;

use super::Postprocessor;

const MODIFIER_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Modifier {
    Lower,
    Upper,
    Substr { start: usize, end: Option<usize> },
    Replace { from: String, to: String },
}

impl Modifier {
    fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let (name, args) = match trimmed.split_once('(') {
            Some((name, rest)) => {
                let args = rest.strip_suffix(')').ok_or_else(|| {
                    ValidationError::InvalidModifierArguments {
                        value: trimmed.to_owned(),
                    }
                })?;
                (name.trim(), Some(args))
            }
            None => (trimmed, None),
        };

        match (name, args) {
            ("lower", None) => Ok(Self::Lower),
            ("upper", None) => Ok(Self::Upper),
            ("substr", Some(args)) => parse_substr(trimmed, args),
            ("replace", Some(args)) => match args.split_once(',') {
                Some((from, to)) if !from.is_empty() => Ok(Self::Replace {
                    from: from.to_owned(),
                    to: to.to_owned(),
                }),
                _ => Err(ValidationError::InvalidModifierArguments {
                    value: trimmed.to_owned(),
                }),
            },
            ("lower" | "upper", Some(_)) | ("substr" | "replace", None) => {
                Err(ValidationError::InvalidModifierArguments {
                    value: trimmed.to_owned(),
                })
            }
            _ => Err(ValidationError::UnknownHeaderModifier {
                value: trimmed.to_owned(),
            }),
        }
    }

    fn apply(&self, input: &str) -> String {
        match self {
            Self::Lower => input.to_lowercase(),
            Self::Upper => input.to_uppercase(),
            Self::Substr { start, end } => {
                let take = end.map_or(usize::MAX, |end| end.saturating_sub(*start));
                input.chars().skip(*start).take(take).collect()
            }
            Self::Replace { from, to } => input.replace(from.as_str(), to),
        }
    }
}

fn parse_substr(value: &str, args: &str) -> Result<Modifier, ValidationError> {
    let invalid = || ValidationError::InvalidModifierArguments {
        value: value.to_owned(),
    };
    let mut parts = args.split(',').map(str::trim);
    let start = parts
        .next()
        .and_then(|part| part.parse::<usize>().ok())
        .ok_or_else(invalid)?;
    let end = match parts.next() {
        Some(part) => Some(part.parse::<usize>().map_err(|_err| invalid())?),
        None => None,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Modifier::Substr { start, end })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderRule {
    header: String,
    modifiers: Vec<Modifier>,
}

impl HeaderRule {
    fn parse(expression: &str) -> Result<Self, ValidationError> {
        let mut pieces = expression.split(MODIFIER_SEPARATOR);
        let header = pieces.next().map(str::trim).unwrap_or_default();
        if header.is_empty() {
            return Err(ValidationError::HeaderNameEmpty);
        }
        let modifiers = pieces.map(Modifier::parse).collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            header: header.to_owned(),
            modifiers,
        })
    }

    fn extract(&self, response: &ResponseParts) -> String {
        let raw = response
            .headers
            .get(self.header.as_str())
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
        self.modifiers
            .iter()
            .fold(raw, |value, modifier| modifier.apply(&value))
    }
}

/// Copies response headers into variables, optionally reshaped by modifiers.
///
/// Expressions look like `Content-Type|lower|substr(0,9)`. A missing header
/// yields an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderExtractor {
    mapping: BTreeMap<String, String>,
    rules: BTreeMap<String, HeaderRule>,
}

impl HeaderExtractor {
    /// # Errors
    ///
    /// Returns an error naming the mapping key whose expression is malformed.
    pub fn new(step: &str, mapping: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut rules = BTreeMap::new();
        for (key, expression) in &mapping {
            let rule =
                HeaderRule::parse(expression).map_err(|source| ConfigError::InvalidExpression {
                    step: step.to_owned(),
                    key: key.clone(),
                    source,
                })?;
            rules.insert(key.clone(), rule);
        }
        Ok(Self { mapping, rules })
    }

    #[must_use]
    pub const fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

impl Postprocessor for HeaderExtractor {
    fn process(&self, response: &ResponseParts) -> Result<Vars, ExtractError> {
        Ok(self
            .rules
            .iter()
            .map(|(key, rule)| (key.clone(), Value::String(rule.extract(response))))
            .collect())
    }
}
