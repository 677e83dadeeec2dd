use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use http::Method;

use crate::error::ValidationError;
use crate::postprocess::Extractor;
use crate::template::StepTemplater;
use crate::transport::RequestParts;

pub const SLEEP_STEP: &str = "sleep";

/// A named, reusable request template with its postprocessor chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestStep {
    pub name: String,
    pub method: Method,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub postprocessors: Vec<Extractor>,
    pub templater: StepTemplater,
}

impl RequestStep {
    #[must_use]
    pub fn new(name: impl Into<String>, method: Method, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            uri: uri.into(),
            headers: BTreeMap::new(),
            body: None,
            postprocessors: Vec::new(),
            templater: StepTemplater::default(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_postprocessor(mut self, postprocessor: Extractor) -> Self {
        self.postprocessors.push(postprocessor);
        self
    }

    #[must_use]
    pub fn with_templater(mut self, templater: StepTemplater) -> Self {
        self.templater = templater;
        self
    }

    /// Untemplated request fields, ready to be rendered for one execution.
    #[must_use]
    pub fn request_parts(&self) -> RequestParts {
        RequestParts {
            method: self.method.clone(),
            url: self.uri.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// One entry of a scenario's request list: `name(count)` or `sleep(ms)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRef {
    Request { name: String, count: u32 },
    Sleep(Duration),
}

impl StepRef {
    #[must_use]
    pub fn request(name: impl Into<String>, count: u32) -> Self {
        Self::Request {
            name: name.into(),
            count,
        }
    }

    #[must_use]
    pub const fn sleep_ms(millis: u64) -> Self {
        Self::Sleep(Duration::from_millis(millis))
    }
}

impl FromStr for StepRef {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || ValidationError::InvalidStepReference {
            value: value.to_owned(),
        };

        let (name, argument) = match trimmed.split_once('(') {
            Some((name, rest)) => {
                let argument = rest.strip_suffix(')').ok_or_else(invalid)?;
                (name.trim(), Some(argument.trim()))
            }
            None => (trimmed, None),
        };
        if name.is_empty() {
            return Err(ValidationError::StepReferenceNameEmpty);
        }
        if name
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '(' || ch == ')')
        {
            return Err(invalid());
        }

        if name == SLEEP_STEP {
            let argument = argument.ok_or_else(invalid)?;
            let millis = argument
                .parse::<u64>()
                .map_err(|source| ValidationError::InvalidRepeatCount {
                    value: value.to_owned(),
                    source,
                })?;
            return Ok(Self::sleep_ms(millis));
        }

        let count = match argument {
            None => 1,
            Some(argument) => argument.parse::<u32>().map_err(|source| {
                ValidationError::InvalidRepeatCount {
                    value: value.to_owned(),
                    source,
                }
            })?,
        };
        if count == 0 {
            return Err(ValidationError::ZeroRepeatCount {
                value: value.to_owned(),
            });
        }
        Ok(Self::request(name, count))
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { name, count } => write!(f, "{}({})", name, count),
            Self::Sleep(duration) => write!(f, "{}({})", SLEEP_STEP, duration.as_millis()),
        }
    }
}
