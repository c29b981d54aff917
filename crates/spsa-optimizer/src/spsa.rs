//! The SPSA iteration loop.
//!
//! Each iteration estimates the full gradient from two objective
//! evaluations at `theta ± ck·delta`, steps against it by `ak`, and projects
//! the result back into the configured box.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use spsa_types::{
    ExtraArgs, IterationReport, ParamVector, ProgressLog, SpsaError, SpsaResult,
};

use crate::config::SpsaConfig;
use crate::objective::Objective;
use crate::perturbation::Perturbation;

/// Everything a finished run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpsaOutcome {
    /// Final parameter vector.
    pub theta: ParamVector,
    /// Objective value at `theta`, computed once after the last iteration.
    pub value: f64,
    /// Present when a progress stride was configured.
    pub progress: Option<ProgressLog>,
    /// Number of update iterations performed.
    pub iterations: usize,
    /// Total number of objective evaluations, including the final one.
    pub evaluations: usize,
}

/// Consumer of periodic [`IterationReport`]s.
pub trait ReportObserver {
    fn on_report(&mut self, report: &IterationReport);
}

impl<F> ReportObserver for F
where
    F: FnMut(&IterationReport),
{
    fn on_report(&mut self, report: &IterationReport) {
        self(report)
    }
}

/// An SPSA optimizer bound to one configuration and one random source.
pub struct Spsa<R = ChaCha8Rng> {
    config: SpsaConfig,
    rng: R,
}

impl Spsa<ChaCha8Rng> {
    /// Seed from `config.seed`, or from OS entropy when it is unset.
    pub fn new(config: SpsaConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, rng }
    }
}

impl<R: Rng> Spsa<R> {
    /// Use an injected random source; `config.seed` is ignored.
    pub fn with_rng(config: SpsaConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &SpsaConfig {
        &self.config
    }

    /// Minimize `objective` starting from `theta0`.
    pub fn run<O>(&mut self, objective: &mut O, theta0: impl Into<ParamVector>) -> SpsaResult<SpsaOutcome>
    where
        O: Objective + ?Sized,
    {
        self.drive(objective, theta0.into(), None)
    }

    /// Like [`run`](Self::run), also handing every report to `observer`.
    pub fn run_with_observer<O, W>(
        &mut self,
        objective: &mut O,
        theta0: impl Into<ParamVector>,
        observer: &mut W,
    ) -> SpsaResult<SpsaOutcome>
    where
        O: Objective + ?Sized,
        W: ReportObserver,
    {
        self.drive(objective, theta0.into(), Some(observer as &mut dyn ReportObserver))
    }

    fn drive<O>(
        &mut self,
        objective: &mut O,
        mut theta: ParamVector,
        mut observer: Option<&mut dyn ReportObserver>,
    ) -> SpsaResult<SpsaOutcome>
    where
        O: Objective + ?Sized,
    {
        let p = theta.len();
        let plan = self.config.plan(p)?;

        if let Some(arity) = objective.arity() {
            let inputs = p + plan.extra_args.len();
            if arity != inputs {
                return Err(SpsaError::DimensionMismatch {
                    what: "objective arity".to_string(),
                    expected: arity,
                    actual: inputs,
                });
            }
        }

        info!(
            "Starting SPSA: {} iterations over {} parameters (A = {})",
            plan.n_iter, p, plan.gains.stability
        );

        let mut eval = Evaluator {
            objective,
            extra_args: &plan.extra_args,
            strict: plan.strict,
            count: 0,
        };
        let mut progress = plan.progress_stride.map(ProgressLog::new);

        let mut delta = Perturbation::new(p);
        let mut theta_plus = vec![0.0; p];
        let mut theta_minus = vec![0.0; p];

        for k in 1..=plan.n_iter {
            let ak = plan.gains.ak(k);
            let ck = plan.gains.ck(k);

            delta.resample(&mut self.rng);
            delta.shift_into(&theta, ck, &mut theta_plus, &mut theta_minus);

            let y_plus = eval.at(&theta_plus, k, &theta)?;
            let y_minus = eval.at(&theta_minus, k, &theta)?;

            let diff = y_plus - y_minus;
            for (x, s) in theta.iter_mut().zip(delta.signs()) {
                let g_hat = diff / (2.0 * ck * s.value());
                *x -= ak * g_hat;
            }
            plan.bounds.project(&mut theta);

            trace!("k={} ak={} ck={} y+={} y-={}", k, ak, ck, y_plus, y_minus);

            if let Some(log) = progress.as_mut() {
                if log.is_due(k) {
                    let value = eval.at(&theta, k, &theta)?;
                    log.record(k, value);
                }
            }

            if plan.report_due(k) {
                let value = eval.at(&theta, k, &theta)?;
                let report = IterationReport {
                    iteration: k,
                    theta: theta.clone(),
                    value,
                };
                info!("{}", report);
                if let Some(obs) = observer.as_deref_mut() {
                    obs.on_report(&report);
                }
            }
        }

        let value = eval.at(&theta, plan.n_iter, &theta)?;
        debug!(
            "SPSA finished after {} evaluations: value {} at {}",
            eval.count, value, theta
        );

        Ok(SpsaOutcome {
            theta,
            value,
            progress,
            iterations: plan.n_iter,
            evaluations: eval.count,
        })
    }
}

/// Minimize `objective` from `theta0` with a fresh optimizer built from
/// `config`.
pub fn optimize<O>(
    objective: &mut O,
    theta0: impl Into<ParamVector>,
    config: &SpsaConfig,
) -> SpsaResult<SpsaOutcome>
where
    O: Objective + ?Sized,
{
    Spsa::new(config.clone()).run(objective, theta0)
}

struct Evaluator<'a, O: ?Sized> {
    objective: &'a mut O,
    extra_args: &'a ExtraArgs,
    strict: bool,
    count: usize,
}

impl<O: Objective + ?Sized> Evaluator<'_, O> {
    /// Evaluate at `point` during iteration `k`; `theta` is the last
    /// fully-updated vector, carried into the error on failure.
    fn at(&mut self, point: &[f64], k: usize, theta: &[f64]) -> SpsaResult<f64> {
        self.count += 1;
        let value = self
            .objective
            .evaluate(point, self.extra_args)
            .map_err(|source| SpsaError::Objective {
                iteration: k,
                theta: theta.to_vec(),
                source,
            })?;
        if self.strict && !value.is_finite() {
            return Err(SpsaError::NonFinite {
                iteration: k,
                value,
            });
        }
        Ok(value)
    }
}
