//! The validated ammo model: sources, request steps, and scenarios.
mod scenario;
mod step;


use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{ConfigError, SourceError, ValidationError};
use crate::scope::Scope;
use crate::source::{Source, VariableSource};

pub use scenario::Scenario;
pub use step::{RequestStep, SLEEP_STEP, StepRef};

#[derive(Debug, PartialEq)]
pub struct AmmoModel {
    sources: Vec<Source>,
    steps: Vec<RequestStep>,
    scenarios: Vec<Scenario>,
}

impl AmmoModel {
    /// Builds a model after checking name uniqueness and step references.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate names, a scenario without requests, or
    /// a reference to a request step that does not exist.
    pub fn new(
        sources: Vec<Source>,
        steps: Vec<RequestStep>,
        scenarios: Vec<Scenario>,
    ) -> Result<Self, ConfigError> {
        let mut source_names = BTreeSet::new();
        for source in &sources {
            if !source_names.insert(source.name()) {
                return Err(ConfigError::DuplicateSource {
                    name: source.name().to_owned(),
                });
            }
        }

        let mut step_names = BTreeSet::new();
        for step in &steps {
            if !step_names.insert(step.name.as_str()) {
                return Err(ConfigError::DuplicateStep {
                    name: step.name.clone(),
                });
            }
        }

        let mut scenario_names = BTreeSet::new();
        for scenario in &scenarios {
            if !scenario_names.insert(scenario.name.as_str()) {
                return Err(ConfigError::DuplicateScenario {
                    name: scenario.name.clone(),
                });
            }
            if scenario.refs.is_empty() {
                return Err(ConfigError::ScenarioMissingSteps {
                    name: scenario.name.clone(),
                });
            }
            for step_ref in &scenario.refs {
                if let StepRef::Request { name, count } = step_ref {
                    if *count == 0 {
                        return Err(ConfigError::InvalidStepReference {
                            scenario: scenario.name.clone(),
                            source: ValidationError::ZeroRepeatCount {
                                value: step_ref.to_string(),
                            },
                        });
                    }
                    if !step_names.contains(name.as_str()) {
                        return Err(ConfigError::UnresolvedStep {
                            scenario: scenario.name.clone(),
                            step: name.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            sources,
            steps,
            scenarios,
        })
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    #[must_use]
    pub fn steps(&self) -> &[RequestStep] {
        &self.steps
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn step_index(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.name == name)
    }

    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }

    /// Initializes every source in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first source failure.
    pub fn init_sources(&self) -> Result<(), SourceError> {
        for source in &self.sources {
            source.init()?;
            debug!(
                "Initialized variable source '{}' ({}).",
                source.name(),
                source.kind()
            );
        }
        Ok(())
    }

    /// Fresh scope for one iteration, advancing every file-backed source once.
    ///
    /// # Errors
    ///
    /// Returns an error when a source has not been initialized.
    pub fn seed_scope(&self) -> Result<Scope, SourceError> {
        let mut seeded = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            seeded.push((source.name().to_owned(), source.variables()?));
        }
        Ok(Scope::seeded(seeded))
    }
}
