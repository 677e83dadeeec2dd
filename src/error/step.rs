use thiserror::Error;

use super::{ExtractError, TemplateError, TransportError};

#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// A local failure tagged with the scenario and request it happened in.
#[derive(Debug, Error)]
#[error("Scenario '{scenario}', request '{step}': {source}")]
pub struct StepError {
    pub scenario: String,
    pub step: String,
    #[source]
    pub source: StepFailure,
}

impl StepError {
    pub fn new<E>(scenario: &str, step: &str, error: E) -> Self
    where
        E: Into<StepFailure>,
    {
        Self {
            scenario: scenario.to_owned(),
            step: step.to_owned(),
            source: error.into(),
        }
    }
}
