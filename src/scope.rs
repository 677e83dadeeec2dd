//! Per-iteration variable scope.
use std::collections::BTreeMap;

use serde_json::Value;

/// Named values produced by a variable source or a postprocessor.
pub type Vars = BTreeMap<String, Value>;

/// Key under which variable-source values are seeded into a scope.
pub const SOURCE_NAMESPACE: &str = "source";

/// Variables visible to one scenario iteration.
///
/// A scope is owned by exactly one iteration and moved through its steps;
/// it is never shared between iterations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    vars: Vars,
}

impl Scope {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Builds a scope with every source's variables under `source.<name>`.
    #[must_use]
    pub fn seeded<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (String, Vars)>,
    {
        let namespace: serde_json::Map<String, Value> = sources
            .into_iter()
            .map(|(name, vars)| (name, Value::Object(vars.into_iter().collect())))
            .collect();
        let mut vars = BTreeMap::new();
        if !namespace.is_empty() {
            vars.insert(SOURCE_NAMESPACE.to_owned(), Value::Object(namespace));
        }
        Self { vars }
    }

    /// Merges extracted values; existing keys are overwritten.
    pub fn merge(&mut self, vars: Vars) {
        self.vars.extend(vars);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.vars.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Resolves a dotted path; numeric segments index into arrays.
    #[must_use]
    pub fn lookup<S>(&self, path: &[S]) -> Option<&Value>
    where
        S: AsRef<str>,
    {
        let (first, rest) = path.split_first()?;
        let mut current = self.vars.get(first.as_ref())?;
        for segment in rest {
            let segment = segment.as_ref();
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    return None;
                }
            };
        }
        Some(current)
    }

    #[must_use]
    pub const fn vars(&self) -> &Vars {
        &self.vars
    }
}
