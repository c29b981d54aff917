//! Fixed-length parameter vectors and per-coordinate box constraints.

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::errors::{SpsaError, SpsaResult};

/// An ordered, fixed-length vector of real parameters.
///
/// The length is set at construction and cannot change afterwards; elements
/// are mutated in place through the slice view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamVector(Vec<f64>);

impl ParamVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean distance to `other`. Panics if the lengths differ.
    pub fn distance(&self, other: &[f64]) -> f64 {
        assert_eq!(self.0.len(), other.len(), "distance between vectors of different length");
        self.0
            .iter()
            .zip(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Fail with [`SpsaError::DimensionMismatch`] unless `self.len() == expected`.
    pub fn ensure_len(&self, what: &str, expected: usize) -> SpsaResult<()> {
        if self.0.len() != expected {
            return Err(SpsaError::DimensionMismatch {
                what: what.to_string(),
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }
}

impl Deref for ParamVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for ParamVector {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl From<Vec<f64>> for ParamVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for ParamVector {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ParamVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl std::fmt::Display for ParamVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Optional lower and upper box constraints, each enforced independently.
///
/// Build through [`Bounds::new`] to get the length and ordering checks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bounds {
    pub lower: Option<ParamVector>,
    pub upper: Option<ParamVector>,
}

impl Bounds {
    /// Unconstrained bounds.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build bounds for a `dim`-dimensional parameter vector.
    ///
    /// Lengths must match `dim` exactly, and wherever both sides are present
    /// the lower bound must not exceed the upper one.
    pub fn new(
        lower: Option<ParamVector>,
        upper: Option<ParamVector>,
        dim: usize,
    ) -> SpsaResult<Self> {
        if let Some(lo) = &lower {
            lo.ensure_len("theta_min", dim)?;
            if lo.iter().any(|v| v.is_nan()) {
                return Err(crate::config_error!("theta_min contains NaN"));
            }
        }
        if let Some(hi) = &upper {
            hi.ensure_len("theta_max", dim)?;
            if hi.iter().any(|v| v.is_nan()) {
                return Err(crate::config_error!("theta_max contains NaN"));
            }
        }
        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            if let Some(i) = lo.iter().zip(hi.iter()).position(|(l, h)| l > h) {
                return Err(crate::config_error!(
                    "theta_min[{i}] = {} exceeds theta_max[{i}] = {}",
                    lo[i],
                    hi[i]
                ));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Clamp every coordinate of `theta` into the enforced interval.
    ///
    /// Coordinates that are NaN are left untouched.
    pub fn project(&self, theta: &mut [f64]) {
        if let Some(lo) = &self.lower {
            for (x, &min) in theta.iter_mut().zip(lo.iter()) {
                if *x < min {
                    *x = min;
                }
            }
        }
        if let Some(hi) = &self.upper {
            for (x, &max) in theta.iter_mut().zip(hi.iter()) {
                if *x > max {
                    *x = max;
                }
            }
        }
    }
}
