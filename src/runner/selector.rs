use rand::Rng;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};

use crate::ammo::Scenario;
use crate::error::ConfigError;

/// Weight-proportional scenario choice; weight 0 is never picked.
#[derive(Debug, Clone)]
pub struct ScenarioSelector {
    index: WeightedIndex<u64>,
}

impl ScenarioSelector {
    /// # Errors
    ///
    /// Returns an error when there are no scenarios or every weight is zero.
    pub fn new(scenarios: &[Scenario]) -> Result<Self, ConfigError> {
        if scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        let index = WeightedIndex::new(scenarios.iter().map(Scenario::selection_weight))
            .map_err(|err| match err {
                WeightedError::NoItem => ConfigError::NoScenarios,
                _ => ConfigError::NoSelectableScenario,
            })?;
        Ok(Self { index })
    }

    /// Index of the scenario to run next.
    pub fn pick<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        self.index.sample(rng)
    }
}
