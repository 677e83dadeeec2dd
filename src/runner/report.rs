use std::time::Duration;

use crate::error::StepError;

/// One request execution inside an iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSample {
    pub step: String,
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub success: bool,
}

/// What happened during one scenario iteration.
#[derive(Debug)]
pub struct IterationReport {
    pub scenario: String,
    pub samples: Vec<StepSample>,
    pub elapsed: Duration,
    pub failure: Option<StepError>,
}

impl IterationReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    #[must_use]
    pub fn executed(&self, step: &str) -> usize {
        self.samples
            .iter()
            .filter(|sample| sample.step == step)
            .count()
    }
}
