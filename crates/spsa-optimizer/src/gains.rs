//! Step-size and perturbation-size schedules.

use serde::{Deserialize, Serialize};
use spsa_types::{config_error, SpsaResult};

/// The five constants driving the decaying gains
/// `ak = a / (k + A)^alpha` and `ck = c / k^gamma`.
///
/// `A` (`stability`) is optional; when unset it resolves to `n_iter / 10`
/// at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainSchedule {
    pub alpha: f64,
    pub gamma: f64,
    pub a: f64,
    pub c: f64,
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
}

impl Default for GainSchedule {
    fn default() -> Self {
        Self {
            alpha: 0.602,
            gamma: 0.101,
            a: 0.2,
            c: 0.2,
            stability: None,
        }
    }
}

impl GainSchedule {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_a(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_stability(mut self, stability: f64) -> Self {
        self.stability = Some(stability);
        self
    }

    /// Check the constants keep both gains positive and decaying, with `ck`
    /// decaying slower than `ak`.
    pub fn validate(&self) -> SpsaResult<()> {
        let named = [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("a", self.a),
            ("c", self.c),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(config_error!("gain {name} must be finite, got {value}"));
            }
        }
        if self.a <= 0.0 {
            return Err(config_error!("gain a must be positive, got {}", self.a));
        }
        if self.c <= 0.0 {
            return Err(config_error!("gain c must be positive, got {}", self.c));
        }
        if self.alpha <= 0.0 {
            return Err(config_error!("gain alpha must be positive, got {}", self.alpha));
        }
        if self.gamma < 0.0 {
            return Err(config_error!("gain gamma must be non-negative, got {}", self.gamma));
        }
        if self.gamma >= self.alpha {
            return Err(config_error!(
                "gain gamma ({}) must be smaller than alpha ({})",
                self.gamma,
                self.alpha
            ));
        }
        if let Some(stability) = self.stability {
            if !stability.is_finite() || stability < 0.0 {
                return Err(config_error!(
                    "stability constant A must be finite and >= 0, got {stability}"
                ));
            }
        }
        Ok(())
    }

    /// Fix `A` for a run of `n_iter` iterations.
    pub fn resolve(&self, n_iter: usize) -> SpsaResult<ResolvedGains> {
        self.validate()?;
        Ok(ResolvedGains {
            alpha: self.alpha,
            gamma: self.gamma,
            a: self.a,
            c: self.c,
            stability: self.stability.unwrap_or(n_iter as f64 / 10.0),
        })
    }
}

/// Gain constants with `A` fixed for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGains {
    pub alpha: f64,
    pub gamma: f64,
    pub a: f64,
    pub c: f64,
    pub stability: f64,
}

impl ResolvedGains {
    /// Update step size at iteration `k >= 1`.
    pub fn ak(&self, k: usize) -> f64 {
        self.a / (k as f64 + self.stability).powf(self.alpha)
    }

    /// Perturbation magnitude at iteration `k >= 1`.
    pub fn ck(&self, k: usize) -> f64 {
        self.c / (k as f64).powf(self.gamma)
    }
}
