use std::collections::BTreeMap;

use serde_json::{Number, Value};
use sxd_document::parser;
use sxd_xpath::{Factory, Value as XPathValue, evaluate_xpath};

use crate::error::{ConfigError, ExtractError, ValidationError};
use crate::scope::Vars;
use crate::transport::ResponseParts;

use super::Postprocessor;

/// Evaluates XPath expressions against an XML response body.
///
/// Compiled expressions are not thread-safe, so they are syntax-checked at
/// build time and re-parsed on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExtractor {
    mapping: BTreeMap<String, String>,
}

impl XPathExtractor {
    /// # Errors
    ///
    /// Returns an error naming the mapping key whose expression does not parse.
    pub fn new(step: &str, mapping: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let factory = Factory::new();
        for (key, expression) in &mapping {
            let invalid = |message: String| ConfigError::InvalidExpression {
                step: step.to_owned(),
                key: key.clone(),
                source: ValidationError::InvalidXPath {
                    expression: expression.clone(),
                    message,
                },
            };
            match factory.build(expression) {
                Ok(Some(_)) => {}
                Ok(None) => return Err(invalid("expression is empty".to_owned())),
                Err(err) => return Err(invalid(err.to_string())),
            }
        }
        Ok(Self { mapping })
    }

    #[must_use]
    pub const fn mapping(&self) -> &BTreeMap<String, String> {
        &self.mapping
    }
}

impl Postprocessor for XPathExtractor {
    fn process(&self, response: &ResponseParts) -> Result<Vars, ExtractError> {
        let mut vars = Vars::new();
        if self.mapping.is_empty() {
            return Ok(vars);
        }
        let body = String::from_utf8_lossy(&response.body);
        let package = match parser::parse(&body) {
            Ok(package) => package,
            Err(err) => {
                let key = self.mapping.keys().next().cloned().unwrap_or_default();
                return Err(ExtractError::ParseXml {
                    key,
                    message: format!("{:?}", err),
                });
            }
        };
        let document = package.as_document();

        for (key, expression) in &self.mapping {
            let result =
                evaluate_xpath(&document, expression).map_err(|err| ExtractError::EvaluateXPath {
                    key: key.clone(),
                    message: err.to_string(),
                })?;
            let value = match result {
                XPathValue::Nodeset(nodes) => {
                    let mut texts: Vec<Value> = nodes
                        .document_order()
                        .into_iter()
                        .map(|node| Value::String(node.string_value()))
                        .collect();
                    match texts.len() {
                        0 => {
                            return Err(ExtractError::NoMatch {
                                key: key.clone(),
                                expression: expression.clone(),
                            });
                        }
                        1 => texts.pop().unwrap_or(Value::Null),
                        _ => Value::Array(texts),
                    }
                }
                XPathValue::String(text) => Value::String(text),
                XPathValue::Boolean(flag) => Value::Bool(flag),
                XPathValue::Number(number) => {
                    Number::from_f64(number).map_or(Value::Null, Value::Number)
                }
            };
            vars.insert(key.clone(), value);
        }
        Ok(vars)
    }
}
