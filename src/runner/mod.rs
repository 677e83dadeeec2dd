//! Scenario iterations: selection, scope seeding, step execution, pacing.
mod report;
mod selector;


use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::thread_rng;
use tracing::{debug, error};

use crate::ammo::{AmmoModel, RequestStep, StepRef};
use crate::error::{AppResult, ConfigError, StepError};
use crate::postprocess::run_chain;
use crate::scope::Scope;
use crate::template::Templater;
use crate::transport::Transport;

pub use report::{IterationReport, StepSample};
pub use selector::ScenarioSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlannedRef {
    Request { step: usize, count: u32 },
    Sleep(Duration),
}

#[derive(Debug)]
struct ScenarioPlan {
    name: String,
    pacing: Duration,
    refs: Vec<PlannedRef>,
}

/// Runs scenario iterations against a transport. Shared across tasks via `Arc`.
pub struct ScenarioRunner {
    model: Arc<AmmoModel>,
    transport: Arc<dyn Transport>,
    plans: Vec<ScenarioPlan>,
    selector: Option<ScenarioSelector>,
}

impl ScenarioRunner {
    /// Resolves step references and initializes every variable source.
    ///
    /// # Errors
    ///
    /// Returns an error when no scenario is selectable or a source fails to
    /// initialize.
    pub fn new(model: Arc<AmmoModel>, transport: Arc<dyn Transport>) -> AppResult<Self> {
        let selector = ScenarioSelector::new(model.scenarios())?;
        Self::build(model, transport, Some(selector))
    }

    /// Builds a runner that only runs scenarios by name, so weights are
    /// never consulted and zero-weight scenarios stay runnable.
    ///
    /// # Errors
    ///
    /// Returns an error when the model has no scenarios or a source fails to
    /// initialize.
    pub fn pinned(model: Arc<AmmoModel>, transport: Arc<dyn Transport>) -> AppResult<Self> {
        if model.scenarios().is_empty() {
            return Err(ConfigError::NoScenarios.into());
        }
        Self::build(model, transport, None)
    }

    fn build(
        model: Arc<AmmoModel>,
        transport: Arc<dyn Transport>,
        selector: Option<ScenarioSelector>,
    ) -> AppResult<Self> {
        let mut plans = Vec::with_capacity(model.scenarios().len());
        for scenario in model.scenarios() {
            let mut refs = Vec::with_capacity(scenario.refs.len());
            for step_ref in &scenario.refs {
                refs.push(match step_ref {
                    StepRef::Request { name, count } => {
                        let step = model.step_index(name).ok_or_else(|| {
                            ConfigError::UnresolvedStep {
                                scenario: scenario.name.clone(),
                                step: name.clone(),
                            }
                        })?;
                        PlannedRef::Request {
                            step,
                            count: *count,
                        }
                    }
                    StepRef::Sleep(duration) => PlannedRef::Sleep(*duration),
                });
            }
            plans.push(ScenarioPlan {
                name: scenario.name.clone(),
                pacing: scenario.pacing(),
                refs,
            });
        }
        model.init_sources()?;
        Ok(Self {
            model,
            transport,
            plans,
            selector,
        })
    }

    #[must_use]
    pub fn model(&self) -> &AmmoModel {
        &self.model
    }

    /// Runs one iteration of a weight-selected scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when the runner was built with [`ScenarioRunner::pinned`]
    /// or the scope cannot be seeded; step failures are reported in the
    /// returned report.
    pub async fn run_iteration(&self) -> AppResult<IterationReport> {
        let selector = self
            .selector
            .as_ref()
            .ok_or(ConfigError::NoSelectableScenario)?;
        let index = selector.pick(&mut thread_rng());
        self.run_plan(index).await
    }

    /// Runs one iteration of the named scenario.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown scenario or when the scope cannot be
    /// seeded.
    pub async fn run_scenario(&self, name: &str) -> AppResult<IterationReport> {
        let index = self
            .plans
            .iter()
            .position(|plan| plan.name == name)
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_owned(),
            })?;
        self.run_plan(index).await
    }

    async fn run_plan(&self, index: usize) -> AppResult<IterationReport> {
        let plan = self
            .plans
            .get(index)
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: index.to_string(),
            })?;
        let scope = self.model.seed_scope()?;
        self.execute(plan, scope).await
    }

    /// The pacing floor spaces the starts of consecutive request executions,
    /// repetitions included. `sleep` pauses count toward the gap they sit in.
    async fn execute(&self, plan: &ScenarioPlan, scope: Scope) -> AppResult<IterationReport> {
        let started = Instant::now();
        let mut report = IterationReport {
            scenario: plan.name.clone(),
            samples: Vec::new(),
            elapsed: Duration::ZERO,
            failure: None,
        };
        let mut scope = scope;
        let mut previous_start: Option<Instant> = None;

        for planned in &plan.refs {
            let (index, count) = match *planned {
                PlannedRef::Sleep(duration) => {
                    tokio::time::sleep(duration).await;
                    continue;
                }
                PlannedRef::Request { step, count } => (step, count),
            };
            let step = self.model.steps().get(index).ok_or_else(|| {
                ConfigError::UnresolvedStep {
                    scenario: plan.name.clone(),
                    step: format!("#{}", index),
                }
            })?;
            for _ in 0..count {
                if let Some(previous) = previous_start {
                    let remaining = plan.pacing.saturating_sub(previous.elapsed());
                    if !remaining.is_zero() {
                        tokio::time::sleep(remaining).await;
                    }
                }
                previous_start = Some(Instant::now());
                let (sample, outcome) = self.run_step(&plan.name, step, scope).await;
                report.samples.push(sample);
                match outcome {
                    Ok(next) => scope = next,
                    Err(err) => {
                        error!("Aborting iteration: {}", err);
                        report.failure = Some(err);
                        report.elapsed = started.elapsed();
                        return Ok(report);
                    }
                }
            }
        }

        report.elapsed = started.elapsed();
        Ok(report)
    }

    async fn run_step(
        &self,
        scenario: &str,
        step: &RequestStep,
        mut scope: Scope,
    ) -> (StepSample, Result<Scope, StepError>) {
        let started = Instant::now();
        let mut sample = StepSample {
            step: step.name.clone(),
            status: None,
            elapsed: Duration::ZERO,
            success: false,
        };

        let mut parts = step.request_parts();
        if let Err(err) = step.templater.apply(&mut parts, &scope, scenario, &step.name) {
            sample.elapsed = started.elapsed();
            return (sample, Err(StepError::new(scenario, &step.name, err)));
        }

        debug!("{} {} ({}/{})", parts.method, parts.url, scenario, step.name);
        let response = match self.transport.send(parts).await {
            Ok(response) => response,
            Err(err) => {
                sample.elapsed = started.elapsed();
                return (sample, Err(StepError::new(scenario, &step.name, err)));
            }
        };
        sample.status = Some(response.status);
        sample.elapsed = started.elapsed();

        match run_chain(&step.postprocessors, &response) {
            Ok(vars) => {
                scope.merge(vars);
                sample.success = true;
                (sample, Ok(scope))
            }
            Err(err) => (sample, Err(StepError::new(scenario, &step.name, err))),
        }
    }
}
