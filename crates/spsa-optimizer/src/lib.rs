//! # spsa-optimizer
//!
//! Simultaneous Perturbation Stochastic Approximation: a derivative-free
//! minimizer that estimates the full gradient from two objective
//! evaluations per iteration, whatever the number of parameters.
//!
//! Provides the gain schedule, the ±1 perturbation sampler, the iteration
//! loop with optional box projection, progress recording and periodic
//! reporting, and a rayon-backed runner for independent trials.

mod config;
mod gains;
mod objective;
mod perturbation;
mod spsa;
mod sweep;
mod trial;

pub use config::{RunPlan, SpsaConfig};
pub use gains::{GainSchedule, ResolvedGains};
pub use objective::{Objective, PlainObjective};
pub use perturbation::{Perturbation, Sign};
pub use spsa::{optimize, ReportObserver, Spsa, SpsaOutcome};
pub use sweep::{GainGrid, TrialPlan, TrialSpec};
pub use trial::{SweepReport, Trial, TrialId, TrialResult, TrialRunner, TrialStatus};

pub use spsa_types::{
    Bounds, ExtraArg, ExtraArgs, IterationReport, ObjectiveError, ParamVector, ProgressLog,
    ProgressSample, SpsaError, SpsaResult,
};
