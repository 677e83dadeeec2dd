//! Response postprocessors that extract variables into the iteration scope.
mod header;
mod jsonpath;
mod xpath;


use std::collections::BTreeMap;

use crate::error::{ConfigError, ExtractError};
use crate::scope::Vars;
use crate::transport::ResponseParts;

pub use header::HeaderExtractor;
pub use jsonpath::JsonPathExtractor;
pub use xpath::XPathExtractor;

pub const HEADER_KIND: &str = "var/header";
pub const XPATH_KIND: &str = "var/xpath";
pub const JSONPATH_KIND: &str = "var/jsonpath";

pub trait Postprocessor {
    /// Produces one variable per mapping key.
    ///
    /// # Errors
    ///
    /// Returns an error naming the key that could not be extracted.
    fn process(&self, response: &ResponseParts) -> Result<Vars, ExtractError>;
}

/// One postprocessor attached to a request step.
#[derive(Debug, Clone, PartialEq)]
pub enum Extractor {
    Header(HeaderExtractor),
    XPath(XPathExtractor),
    JsonPath(JsonPathExtractor),
}

impl Extractor {
    /// Builds the postprocessor tagged `kind` for request `step`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown tag or a malformed expression.
    pub fn build(
        step: &str,
        kind: &str,
        mapping: BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        match kind {
            HEADER_KIND => Ok(Self::Header(HeaderExtractor::new(step, mapping)?)),
            XPATH_KIND => Ok(Self::XPath(XPathExtractor::new(step, mapping)?)),
            JSONPATH_KIND => Ok(Self::JsonPath(JsonPathExtractor::new(step, mapping)?)),
            other => Err(ConfigError::UnknownPostprocessorType {
                step: step.to_owned(),
                kind: other.to_owned(),
            }),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Header(_) => HEADER_KIND,
            Self::XPath(_) => XPATH_KIND,
            Self::JsonPath(_) => JSONPATH_KIND,
        }
    }

    /// Produced variable name to expression, as configured.
    #[must_use]
    pub const fn mapping(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Header(extractor) => extractor.mapping(),
            Self::XPath(extractor) => extractor.mapping(),
            Self::JsonPath(extractor) => extractor.mapping(),
        }
    }
}

impl Postprocessor for Extractor {
    fn process(&self, response: &ResponseParts) -> Result<Vars, ExtractError> {
        match self {
            Self::Header(extractor) => extractor.process(response),
            Self::XPath(extractor) => extractor.process(response),
            Self::JsonPath(extractor) => extractor.process(response),
        }
    }
}

/// Runs `extractors` in order; later outputs overwrite earlier ones.
///
/// # Errors
///
/// Returns the first extraction failure.
pub fn run_chain(extractors: &[Extractor], response: &ResponseParts) -> Result<Vars, ExtractError> {
    let mut vars = Vars::new();
    for extractor in extractors {
        vars.extend(extractor.process(response)?);
    }
    Ok(vars)
}
