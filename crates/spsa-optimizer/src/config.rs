//! Run configuration.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use spsa_types::{config_error, Bounds, ExtraArg, ExtraArgs, ParamVector, SpsaResult};

use crate::gains::{GainSchedule, ResolvedGains};

/// Everything a single SPSA run needs besides the objective and the
/// starting point. Built fresh per call; nothing here is shared between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpsaConfig {
    /// Number of update iterations. The loop always runs exactly this many.
    pub n_iter: usize,

    pub gains: GainSchedule,

    /// Forwarded unchanged to every objective evaluation.
    pub extra_args: Option<ExtraArgs>,

    pub theta_min: Option<ParamVector>,
    pub theta_max: Option<ParamVector>,

    /// Emit an [`IterationReport`](spsa_types::IterationReport) every this
    /// many iterations.
    pub report_stride: Option<usize>,

    /// Record the objective value every this many iterations.
    pub progress_stride: Option<usize>,

    /// Seed for the perturbation sampler. `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Fail on the first non-finite objective value.
    pub strict: bool,
}

impl Default for SpsaConfig {
    fn default() -> Self {
        Self {
            n_iter: 1000,
            gains: GainSchedule::default(),
            extra_args: None,
            theta_min: None,
            theta_max: None,
            report_stride: None,
            progress_stride: None,
            seed: None,
            strict: false,
        }
    }
}

impl SpsaConfig {
    pub fn new(n_iter: usize) -> Self {
        Self {
            n_iter,
            ..Self::default()
        }
    }

    pub fn with_gains(mut self, gains: GainSchedule) -> Self {
        self.gains = gains;
        self
    }

    pub fn with_extra_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ExtraArg>,
    {
        self.extra_args = Some(args.into_iter().collect());
        self
    }

    pub fn with_theta_min(mut self, theta_min: impl Into<ParamVector>) -> Self {
        self.theta_min = Some(theta_min.into());
        self
    }

    pub fn with_theta_max(mut self, theta_max: impl Into<ParamVector>) -> Self {
        self.theta_max = Some(theta_max.into());
        self
    }

    pub fn with_report_stride(mut self, stride: usize) -> Self {
        self.report_stride = Some(stride);
        self
    }

    pub fn with_progress_stride(mut self, stride: usize) -> Self {
        self.progress_stride = Some(stride);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate against a `dim`-dimensional starting point and fix every
    /// derived quantity of the run.
    pub fn plan(&self, dim: usize) -> SpsaResult<RunPlan> {
        let gains = self.gains.resolve(self.n_iter)?;
        let bounds = Bounds::new(self.theta_min.clone(), self.theta_max.clone(), dim)?;
        let report_stride = positive_stride("report_stride", self.report_stride)?;
        let progress_stride = positive_stride("progress_stride", self.progress_stride)?;

        Ok(RunPlan {
            n_iter: self.n_iter,
            gains,
            bounds,
            extra_args: self.extra_args.clone().unwrap_or_default(),
            report_stride,
            progress_stride,
            strict: self.strict,
        })
    }
}

fn positive_stride(name: &str, stride: Option<usize>) -> SpsaResult<Option<NonZeroUsize>> {
    match stride {
        None => Ok(None),
        Some(s) => NonZeroUsize::new(s)
            .map(Some)
            .ok_or_else(|| config_error!("{name} must be a positive integer")),
    }
}

/// A validated configuration bound to one problem dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub n_iter: usize,
    pub gains: ResolvedGains,
    pub bounds: Bounds,
    pub extra_args: ExtraArgs,
    pub report_stride: Option<NonZeroUsize>,
    pub progress_stride: Option<NonZeroUsize>,
    pub strict: bool,
}

impl RunPlan {
    pub fn report_due(&self, k: usize) -> bool {
        self.report_stride.is_some_and(|s| k % s.get() == 0)
    }
}
