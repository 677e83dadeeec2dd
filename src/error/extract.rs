use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Postprocessor '{key}': response body is not valid JSON: {source}")]
    ParseJson {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Postprocessor '{key}': response body is not valid XML: {message}")]
    ParseXml { key: String, message: String },
    #[error("Postprocessor '{key}': XPath evaluation failed: {message}")]
    EvaluateXPath { key: String, message: String },
    #[error("Postprocessor '{key}': '{expression}' matched nothing.")]
    NoMatch { key: String, expression: String },
}
