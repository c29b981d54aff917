//! Objective function interface.

use spsa_types::{ExtraArgs, ObjectiveError};

/// A scalar function to minimize.
///
/// Receives the full parameter vector and the fixed extra arguments of the
/// run. Returning an error aborts the run immediately.
pub trait Objective {
    fn evaluate(&mut self, theta: &[f64], extra: &ExtraArgs) -> Result<f64, ObjectiveError>;

    /// Number of positional inputs (`theta.len() + extra.len()`) the
    /// objective expects, if it declares one. Runs whose shape disagrees
    /// are rejected before the first iteration.
    fn arity(&self) -> Option<usize> {
        None
    }
}

impl<F> Objective for F
where
    F: FnMut(&[f64], &ExtraArgs) -> Result<f64, ObjectiveError>,
{
    fn evaluate(&mut self, theta: &[f64], extra: &ExtraArgs) -> Result<f64, ObjectiveError> {
        self(theta, extra)
    }
}

/// Adapter for objectives that cannot fail.
pub struct PlainObjective<F> {
    f: F,
    arity: Option<usize>,
}

impl<F> PlainObjective<F>
where
    F: FnMut(&[f64], &ExtraArgs) -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f, arity: None }
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }
}

impl<F> Objective for PlainObjective<F>
where
    F: FnMut(&[f64], &ExtraArgs) -> f64,
{
    fn evaluate(&mut self, theta: &[f64], extra: &ExtraArgs) -> Result<f64, ObjectiveError> {
        Ok((self.f)(theta, extra))
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }
}
