use thiserror::Error;

use super::{
    ConfigError, ExtractError, SourceError, StepError, TemplateError, TransportError,
    ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Variable source error: {0}")]
    Source(#[from] SourceError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Step error: {0}")]
    Step(#[from] StepError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn transport<E>(error: E) -> Self
    where
        E: Into<TransportError>,
    {
        error.into().into()
    }
}
