use std::time::Duration;

use super::step::StepRef;

const DEFAULT_WEIGHT: u64 = 1;

/// A weighted, ordered sequence of step references run as one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub weight: Option<u64>,
    pub min_waiting_time: Option<Duration>,
    pub refs: Vec<StepRef>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, refs: Vec<StepRef>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            min_waiting_time: None,
            refs,
        }
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: u64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub const fn with_min_waiting_time(mut self, wait: Duration) -> Self {
        self.min_waiting_time = Some(wait);
        self
    }

    /// Weight used for selection; an absent weight counts as 1.
    #[must_use]
    pub fn selection_weight(&self) -> u64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Pacing floor between consecutive references.
    #[must_use]
    pub fn pacing(&self) -> Duration {
        self.min_waiting_time.unwrap_or_default()
    }
}
