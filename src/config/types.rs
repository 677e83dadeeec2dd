use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The declarative ammo document shared by every input surface.
///
/// TOML repeats singular tables such as `[[request]]`; the structured
/// surfaces (YAML, JSON) use plural lists. Both spellings are accepted
/// everywhere. HCL labeled blocks are mapped onto these types separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmmoDocument {
    #[serde(
        rename = "variable_source",
        alias = "variable_sources",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub variable_sources: Vec<SourceBlock>,
    #[serde(
        rename = "request",
        alias = "requests",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub requests: Vec<RequestBlock>,
    #[serde(
        rename = "scenario",
        alias = "scenarios",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub scenarios: Vec<ScenarioBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceBlock {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_first_line: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBlock {
    pub name: String,
    pub method: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templater: Option<TemplaterField>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(
        rename = "postprocessor",
        alias = "postprocessors",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub postprocessors: Vec<PostprocessorBlock>,
}

/// `templater = "html"` or `templater = { type = "html" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplaterField {
    Name(String),
    Block {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl TemplaterField {
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            TemplaterField::Name(kind) | TemplaterField::Block { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostprocessorBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioBlock {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_waiting_time: Option<u64>,
    #[serde(default)]
    pub requests: Vec<String>,
}
