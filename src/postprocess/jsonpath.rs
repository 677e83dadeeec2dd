use std::collections::BTreeMap;

use serde_json::Value;
use serde_json_path::JsonPath;

use crate::error::{ConfigError, ExtractError, ValidationError};
use crate::scope::Vars;
use crate::transport::ResponseParts;

use super::Postprocessor;

/// Queries a JSON response body with RFC 9535 JSONPath expressions.
#[derive(Debug, Clone)]
pub struct JsonPathExtractor {
    mapping: BTreeMap<String, String>,
    paths: BTreeMap<String, JsonPath>,
}

impl JsonPathExtractor {
    /// Compiles every expression up front.
    ///
    /// # Errors
    ///
    /// Returns an error naming the mapping key whose expression does not parse.
    pub fn new(step: &str, mapping: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut paths = BTreeMap::new();
        for (key, expression) in &mapping {
            let path = JsonPath::parse(expression).map_err(|err| ConfigError::InvalidExpression {
                step: step.to_owned(),
                key: key.clone(),
                source: ValidationError::InvalidJsonPath {
                    expression: expression.clone(),
                    message: err.to_string(),
                },
            })?;
            paths.insert(key.clone(), path);
        }
        Ok(Self { mapping, paths })
    }

    #[must_use]
    pub const fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

impl PartialEq for JsonPathExtractor {
    fn eq(&self, other: &Self) -> bool {
        self.mapping == other.mapping
    }
}

impl Postprocessor for JsonPathExtractor {
    fn process(&self, response: &ResponseParts) -> Result<Vars, ExtractError> {
        let mut vars = Vars::new();
        if self.paths.is_empty() {
            return Ok(vars);
        }
        let document: Value = match serde_json::from_slice(&response.body) {
            Ok(document) => document,
            Err(source) => {
                let key = self.paths.keys().next().cloned().unwrap_or_default();
                return Err(ExtractError::ParseJson { key, source });
            }
        };

        for (key, path) in &self.paths {
            let mut matches = path.query(&document).all();
            let value = match matches.len() {
                0 => {
                    return Err(ExtractError::NoMatch {
                        key: key.clone(),
                        expression: self.mapping.get(key).cloned().unwrap_or_default(),
                    });
                }
                1 => matches.pop().cloned().unwrap_or(Value::Null),
                _ => Value::Array(matches.into_iter().cloned().collect()),
            };
            vars.insert(key.clone(), value);
        }
        Ok(vars)
    }
}
