//! Random simultaneous perturbation directions.

use rand::distributions::{Distribution, Standard};
use rand::Rng;

/// One component of a perturbation vector. Only two values exist, so a
/// zero component cannot be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn value(self) -> f64 {
        match self {
            Self::Plus => 1.0,
            Self::Minus => -1.0,
        }
    }
}

impl Distribution<Sign> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Sign {
        if rng.gen::<bool>() {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

/// Symmetric Bernoulli ±1 vector, resampled in place every iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Perturbation {
    signs: Vec<Sign>,
}

impl Perturbation {
    pub fn new(dim: usize) -> Self {
        Self {
            signs: vec![Sign::Plus; dim],
        }
    }

    pub fn resample<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for s in &mut self.signs {
            *s = rng.gen();
        }
    }

    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    /// Write `theta + scale * delta` into `plus` and `theta - scale * delta`
    /// into `minus`.
    pub fn shift_into(&self, theta: &[f64], scale: f64, plus: &mut [f64], minus: &mut [f64]) {
        for (((x, s), p), m) in theta
            .iter()
            .zip(&self.signs)
            .zip(plus.iter_mut())
            .zip(minus.iter_mut())
        {
            let step = scale * s.value();
            *p = x + step;
            *m = x - step;
        }
    }
}
