mod app;
mod config;
mod extract;
mod source;
mod step;
mod template;
mod transport;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use extract::ExtractError;
pub use source::SourceError;
pub use step::{StepError, StepFailure};
pub use template::TemplateError;
pub use transport::TransportError;
pub use validation::ValidationError;
