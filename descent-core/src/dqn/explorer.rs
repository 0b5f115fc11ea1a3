//! Exploration schedule of the agent.
use super::argmax;
use crate::error::DescentError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy action selection with a linear decay schedule.
///
/// The exploration probability starts at `eps_start`, falls linearly over
/// `final_step` selections down to `eps_final` and is held there afterwards.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Number of selections made so far.
    pub n_steps: usize,

    /// Initial exploration probability.
    pub eps_start: f64,

    /// Floor of the exploration probability.
    pub eps_final: f64,

    /// Number of selections over which the probability decays.
    pub final_step: usize,
}

#[allow(clippy::new_without_default)]
impl EpsilonGreedy {
    /// Constructs the explorer with its default schedule.
    pub fn new() -> Self {
        Self {
            n_steps: 0,
            eps_start: 1.0,
            eps_final: 0.05,
            final_step: 100_000,
        }
    }

    /// Constructs the explorer with a given decay horizon.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            final_step,
            ..Self::new()
        }
    }

    /// Current exploration probability.
    pub fn eps(&self) -> f64 {
        let d = (self.eps_start - self.eps_final) / (self.final_step as f64);
        (self.eps_start - d * self.n_steps as f64).max(self.eps_final)
    }

    /// Selects an action given per-action values, advancing the schedule.
    ///
    /// * `values` - action values of the current observation.
    pub fn action(&mut self, values: &[f32], rng: &mut impl Rng) -> usize {
        let eps = self.eps();
        let is_random = rng.gen::<f64>() < eps;
        self.n_steps += 1;

        if is_random {
            rng.gen_range(0..values.len())
        } else {
            argmax(values)
        }
    }

    /// Set the exploration probability at the final step.
    pub fn eps_final(self, v: f64) -> Self {
        let mut s = self;
        s.eps_final = v;
        s
    }

    /// Set the exploration probability at the start.
    pub fn eps_start(self, v: f64) -> Self {
        let mut s = self;
        s.eps_start = v;
        s
    }

    pub(crate) fn validate(&self) -> Result<(), DescentError> {
        if self.final_step == 0 {
            return Err(DescentError::InvalidConfig(
                "exploration decay horizon must be positive".to_string(),
            ));
        }
        if !(0.0 <= self.eps_final && self.eps_final <= self.eps_start && self.eps_start <= 1.0) {
            return Err(DescentError::InvalidConfig(format!(
                "exploration probabilities must satisfy 0 <= eps_final <= eps_start <= 1, \
                 got eps_start {} and eps_final {}",
                self.eps_start, self.eps_final
            )));
        }
        Ok(())
    }
}
