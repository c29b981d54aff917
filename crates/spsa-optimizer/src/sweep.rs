//! Trial plans: which gain schedules and seeds to try.

use serde::{Deserialize, Serialize};

use crate::gains::GainSchedule;

/// Configuration of one independent trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub gains: GainSchedule,
    pub seed: u64,
}

/// Ordered list of trials to run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialPlan {
    pub specs: Vec<TrialSpec>,
}

impl TrialPlan {
    /// The same gains repeated once per seed.
    pub fn repeated(gains: GainSchedule, seeds: impl IntoIterator<Item = u64>) -> Self {
        Self {
            specs: seeds
                .into_iter()
                .map(|seed| TrialSpec { gains, seed })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Grid over the `a` and `c` gains, crossed with a list of seeds.
///
/// Axes left empty keep the base schedule's value.
#[derive(Debug, Clone, PartialEq)]
pub struct GainGrid {
    base: GainSchedule,
    a_values: Vec<f64>,
    c_values: Vec<f64>,
    seeds: Vec<u64>,
}

impl GainGrid {
    pub fn new(base: GainSchedule) -> Self {
        Self {
            base,
            a_values: Vec::new(),
            c_values: Vec::new(),
            seeds: vec![0],
        }
    }

    pub fn with_a(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.a_values = values.into_iter().collect();
        self
    }

    pub fn with_c(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.c_values = values.into_iter().collect();
        self
    }

    pub fn with_seeds(mut self, seeds: impl IntoIterator<Item = u64>) -> Self {
        self.seeds = seeds.into_iter().collect();
        self
    }

    /// Total number of grid points, `None` on overflow.
    pub fn size(&self) -> Option<usize> {
        self.a_values
            .len()
            .max(1)
            .checked_mul(self.c_values.len().max(1))?
            .checked_mul(self.seeds.len())
    }

    /// Expand the cartesian product `a × c × seed`.
    pub fn build(&self) -> TrialPlan {
        let a_axis = if self.a_values.is_empty() {
            vec![self.base.a]
        } else {
            self.a_values.clone()
        };
        let c_axis = if self.c_values.is_empty() {
            vec![self.base.c]
        } else {
            self.c_values.clone()
        };

        let mut specs = Vec::with_capacity(self.size().unwrap_or(0));
        for &a in &a_axis {
            for &c in &c_axis {
                let gains = self.base.with_a(a).with_c(c);
                for &seed in &self.seeds {
                    specs.push(TrialSpec { gains, seed });
                }
            }
        }
        TrialPlan { specs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_produces_correct_count() {
        let grid = GainGrid::new(GainSchedule::default())
            .with_a([0.1, 0.2, 0.4])
            .with_c([0.05, 0.2])
            .with_seeds([1, 2]);
        assert_eq!(grid.size(), Some(12));
        let plan = grid.build();
        assert_eq!(plan.len(), 12);
        assert_eq!(plan.specs[0].gains.a, 0.1);
        assert_eq!(plan.specs[0].gains.c, 0.05);
        assert_eq!(plan.specs[0].seed, 1);
        assert_eq!(plan.specs[11].gains.a, 0.4);
        assert_eq!(plan.specs[11].gains.c, 0.2);
        assert_eq!(plan.specs[11].seed, 2);
    }

    #[test]
    fn empty_axes_keep_base_values() {
        let base = GainSchedule::default().with_a(0.7);
        let plan = GainGrid::new(base).with_seeds([5, 6, 7]).build();
        assert_eq!(plan.len(), 3);
        assert!(plan.specs.iter().all(|s| s.gains.a == 0.7 && s.gains.c == 0.2));
    }

    #[test]
    fn no_seeds_means_no_trials() {
        let plan = GainGrid::new(GainSchedule::default())
            .with_a([0.1])
            .with_seeds(Vec::<u64>::new())
            .build();
        assert!(plan.is_empty());
    }

    #[test]
    fn repeated_plan() {
        let plan = TrialPlan::repeated(GainSchedule::default(), 0..4);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.specs[3].seed, 3);
    }
}
