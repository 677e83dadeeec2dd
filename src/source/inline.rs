use std::collections::BTreeMap;

use serde_json::Value;

use super::VariableSource;
use crate::error::SourceError;
use crate::scope::Vars;

/// Literal variables declared inline; every call returns the same map.
#[derive(Debug, PartialEq)]
pub struct InlineSource {
    name: String,
    variables: BTreeMap<String, Value>,
}

impl InlineSource {
    #[must_use]
    pub fn new(name: impl Into<String>, variables: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            variables,
        }
    }

    #[must_use]
    pub const fn literals(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }
}

impl VariableSource for InlineSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), SourceError> {
        for (key, value) in &self.variables {
            if matches!(value, Value::Null | Value::Array(_) | Value::Object(_)) {
                return Err(SourceError::NonScalarVariable {
                    name: self.name.clone(),
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }

    fn variables(&self) -> Result<Vars, SourceError> {
        Ok(self.variables.clone())
    }
}
