//! Progress samples and periodic status reports produced during a run.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::vector::ParamVector;

/// One recorded `(iteration, objective value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSample {
    pub iteration: usize,
    pub value: f64,
}

/// Append-only trace of the objective value, sampled every `stride`
/// iterations. Iteration 0 (the starting point) is never sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    stride: NonZeroUsize,
    samples: Vec<ProgressSample>,
}

impl ProgressLog {
    pub fn new(stride: NonZeroUsize) -> Self {
        Self {
            stride,
            samples: Vec::new(),
        }
    }

    pub fn stride(&self) -> NonZeroUsize {
        self.stride
    }

    /// Whether iteration `k` falls on the sampling stride.
    pub fn is_due(&self, k: usize) -> bool {
        k > 0 && k % self.stride.get() == 0
    }

    pub fn record(&mut self, iteration: usize, value: f64) {
        self.samples.push(ProgressSample { iteration, value });
    }

    pub fn samples(&self) -> &[ProgressSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&ProgressSample> {
        self.samples.last()
    }

    /// Split into parallel `(iterations, values)` columns, the shape most
    /// plotting tools expect.
    pub fn columns(&self) -> (Vec<usize>, Vec<f64>) {
        self.samples.iter().map(|s| (s.iteration, s.value)).unzip()
    }
}

/// Status surfaced at every report stride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    pub iteration: usize,
    pub theta: ParamVector,
    pub value: f64,
}

impl std::fmt::Display for IterationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Iteration: {}\tArguments: {}\tFunction value: {}",
            self.iteration, self.theta, self.value
        )
    }
}
