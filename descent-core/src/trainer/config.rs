//! Configuration of [`Trainer`](super::Trainer).
use crate::error::DescentError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The maximum number of training episodes.
    pub max_episodes: usize,

    /// Number of greedy episodes run after the success criterion is met.
    pub eval_episodes: usize,

    /// Trailing mean reward above which the task counts as solved.
    pub solved_threshold: f32,

    /// Number of completed episodes the trailing means are taken over.
    pub solved_window: usize,

    /// Where to save the agent parameters, if anywhere.
    pub model_dir: Option<String>,

    /// Where to save the per-episode results, if anywhere.
    pub results_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_episodes: 1000,
            eval_episodes: 10,
            solved_threshold: f32::INFINITY,
            solved_window: 100,
            model_dir: None,
            results_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the maximum number of training episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the number of evaluation episodes.
    pub fn eval_episodes(mut self, v: usize) -> Self {
        self.eval_episodes = v;
        self
    }

    /// Sets the success threshold on the trailing mean reward.
    pub fn solved_threshold(mut self, v: f32) -> Self {
        self.solved_threshold = v;
        self
    }

    /// Sets the trailing window length.
    pub fn solved_window(mut self, v: usize) -> Self {
        self.solved_window = v;
        self
    }

    /// Sets the directory where agent parameters are saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets the directory where per-episode results are saved.
    pub fn results_dir(mut self, v: impl Into<String>) -> Self {
        self.results_dir = Some(v.into());
        self
    }

    /// Constructs [`TrainerConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), DescentError> {
        if self.max_episodes == 0 {
            return Err(DescentError::InvalidConfig(
                "maximum number of episodes must be positive".to_string(),
            ));
        }
        if self.solved_window == 0 {
            return Err(DescentError::InvalidConfig(
                "trailing window must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
