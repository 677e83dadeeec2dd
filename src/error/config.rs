use super::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse YAML config '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse HCL config '{path}': {source}")]
    ParseHcl {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },
    #[error("Invalid '{block}' block in HCL config '{path}': {message}")]
    InvalidHclBlock {
        path: PathBuf,
        block: String,
        message: String,
    },
    #[error("Failed to render HCL config: {source}")]
    RenderHcl {
        #[source]
        source: hcl::Error,
    },
    #[error("Failed to render TOML config: {source}")]
    RenderToml {
        #[source]
        source: toml::ser::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .yaml, .yml, .json, .toml, or .hcl.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .yaml, .yml, .json, .toml, or .hcl extension.")]
    MissingExtension,
    #[error("Variable source '{name}' has unsupported type '{kind}'.")]
    UnknownSourceType { name: String, kind: String },
    #[error("Request '{step}' has unsupported postprocessor type '{kind}'.")]
    UnknownPostprocessorType { step: String, kind: String },
    #[error("Request '{step}' has unsupported templater '{kind}'. Use text or html.")]
    UnknownTemplater { step: String, kind: String },
    #[error("Variable source '{name}' requires 'file'.")]
    SourceMissingFile { name: String },
    #[error("Variable source '{name}' requires 'variables'.")]
    SourceMissingVariables { name: String },
    #[error("Variable source '{name}' has invalid delimiter '{value}'. Expected one ASCII character.")]
    InvalidDelimiter { name: String, value: String },
    #[error("Request '{step}' has invalid method '{method}'.")]
    InvalidMethod { step: String, method: String },
    #[error("Request '{step}' has invalid expression for '{key}': {source}")]
    InvalidExpression {
        step: String,
        key: String,
        #[source]
        source: ValidationError,
    },
    #[error("Duplicate variable source name '{name}'.")]
    DuplicateSource { name: String },
    #[error("Duplicate request name '{name}'.")]
    DuplicateStep { name: String },
    #[error("Duplicate scenario name '{name}'.")]
    DuplicateScenario { name: String },
    #[error("Scenario '{scenario}' has invalid step reference: {source}")]
    InvalidStepReference {
        scenario: String,
        #[source]
        source: ValidationError,
    },
    #[error("Scenario '{scenario}' references unknown request '{step}'.")]
    UnresolvedStep { scenario: String, step: String },
    #[error("Scenario '{name}' must include at least one request.")]
    ScenarioMissingSteps { name: String },
    #[error("Ammo defines no scenarios.")]
    NoScenarios,
    #[error("Every scenario has weight 0; nothing can be selected.")]
    NoSelectableScenario,
    #[error("Unknown scenario '{name}'.")]
    UnknownScenario { name: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
