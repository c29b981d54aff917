//! Independent trial tracking and parallel execution.
//!
//! Every trial owns its objective instance, parameter vector, random source
//! and progress log, so trials run side by side on the rayon pool without
//! coordination.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use spsa_types::{ParamVector, ProgressLog};

use crate::config::SpsaConfig;
use crate::objective::Objective;
use crate::spsa::Spsa;
use crate::sweep::{TrialPlan, TrialSpec};

/// Unique trial identifier.
pub type TrialId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// A single SPSA run inside a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: TrialId,
    pub trial_number: usize,
    pub spec: TrialSpec,
    pub status: TrialStatus,
    pub result: Option<TrialResult>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Trial {
    pub fn new(trial_number: usize, spec: TrialSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            trial_number,
            spec,
            status: TrialStatus::Pending,
            result: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = TrialStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self, result: TrialResult) {
        self.status = TrialStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.result = Some(result);
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = TrialStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error);
    }

    /// Wall-clock time between start and finish, in milliseconds.
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }
}

/// Result of a completed trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial_id: TrialId,
    pub theta: ParamVector,
    pub value: f64,
    pub evaluations: usize,
    pub progress: Option<ProgressLog>,
}

/// Aggregate outcome of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub trials: Vec<Trial>,
    /// Completed trial with the lowest objective value.
    pub best: Option<TrialResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    pub fn completed(&self) -> usize {
        self.count(TrialStatus::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(TrialStatus::Failed)
    }

    fn count(&self, status: TrialStatus) -> usize {
        self.trials.iter().filter(|t| t.status == status).count()
    }

    /// Replace the best result if `result` has a lower objective value.
    /// NaN values never become best.
    pub fn update_best(&mut self, result: &TrialResult) {
        if result.value.is_nan() {
            return;
        }
        let improves = match &self.best {
            None => true,
            Some(current) => result.value < current.value,
        };
        if improves {
            self.best = Some(result.clone());
        }
    }
}

/// Runs the trials of a [`TrialPlan`] in parallel against a shared base
/// configuration.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    base: SpsaConfig,
}

impl TrialRunner {
    /// `base.gains` and `base.seed` are overridden per trial.
    pub fn new(base: SpsaConfig) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &SpsaConfig {
        &self.base
    }

    /// Run every trial of `plan` from `theta0`. `factory` builds a fresh
    /// objective for each trial. Failed trials are recorded, not propagated.
    pub fn run<O, F>(&self, plan: &TrialPlan, theta0: &ParamVector, factory: F) -> SweepReport
    where
        O: Objective,
        F: Fn() -> O + Sync,
    {
        let started_at = Utc::now();
        info!("Running {} SPSA trials", plan.len());

        let trials: Vec<Trial> = plan
            .specs
            .par_iter()
            .enumerate()
            .map(|(n, spec)| self.run_one(n, *spec, theta0, &factory))
            .collect();

        let mut report = SweepReport {
            trials,
            best: None,
            started_at,
            finished_at: Utc::now(),
        };
        let results: Vec<TrialResult> = report
            .trials
            .iter()
            .filter_map(|t| t.result.clone())
            .collect();
        for result in &results {
            report.update_best(result);
        }

        info!(
            "Sweep finished: {} completed, {} failed",
            report.completed(),
            report.failed()
        );
        report
    }

    fn run_one<O, F>(&self, n: usize, spec: TrialSpec, theta0: &ParamVector, factory: &F) -> Trial
    where
        O: Objective,
        F: Fn() -> O,
    {
        let mut trial = Trial::new(n, spec);
        let mut config = self.base.clone();
        config.gains = spec.gains;
        config.seed = Some(spec.seed);

        let mut objective = factory();
        trial.mark_running();
        match Spsa::new(config).run(&mut objective, theta0.clone()) {
            Ok(outcome) => trial.mark_completed(TrialResult {
                trial_id: trial.id,
                theta: outcome.theta,
                value: outcome.value,
                evaluations: outcome.evaluations,
                progress: outcome.progress,
            }),
            Err(e) => {
                warn!("Trial {} failed: {}", n, e);
                trial.mark_failed(e.to_string());
            }
        }
        trial
    }
}
