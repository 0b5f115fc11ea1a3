//! Configuration of the agent.
use super::EpsilonGreedy;
use crate::error::DescentError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Ddqn`](super::Ddqn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DdqnConfig {
    /// Number of transitions per learning update.
    pub batch_size: usize,

    /// Discount factor of future rewards.
    pub discount_factor: f64,

    /// Interval, in total environment steps, of refreshing the target
    /// estimator with a copy of the online parameters.
    pub sync_interval: usize,

    /// Exploration schedule.
    pub explorer: EpsilonGreedy,

    /// Random seed of the action-selection stream.
    pub seed: u64,
}

impl Default for DdqnConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            discount_factor: 0.99,
            sync_interval: 100,
            explorer: EpsilonGreedy::new(),
            seed: 42,
        }
    }
}

impl DdqnConfig {
    /// Sets the mini-batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the target refresh interval in environment steps.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`DdqnConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DdqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), DescentError> {
        if self.batch_size == 0 {
            return Err(DescentError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        if self.sync_interval == 0 {
            return Err(DescentError::InvalidConfig(
                "target sync interval must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(DescentError::InvalidConfig(format!(
                "discount factor must lie in [0, 1], got {}",
                self.discount_factor
            )));
        }
        self.explorer.validate()
    }
}
