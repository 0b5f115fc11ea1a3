//! This module is used for tests.
use crate::{base::ValueEstimator, Env, Step};
use anyhow::Result;
use std::path::Path;

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    /// Dimensionality of the observation vector.
    pub obs_dim: usize,

    /// Number of discrete actions.
    pub n_actions: usize,

    /// Steps until the episode terminates.
    pub episode_len: usize,

    /// Reward of every step.
    pub reward: f32,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self {
            obs_dim: 2,
            n_actions: 2,
            episode_len: 1,
            reward: 10.0,
        }
    }
}

/// Deterministic environment: every step yields a fixed reward and the
/// episode terminates after a fixed number of steps.
pub struct DummyEnv {
    config: DummyEnvConfig,
    t: usize,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            t: 0,
        })
    }

    fn obs_dim(&self) -> usize {
        self.config.obs_dim
    }

    fn n_actions(&self) -> usize {
        self.config.n_actions
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.t = 0;
        Ok(vec![0.0; self.config.obs_dim])
    }

    fn step(&mut self, _act: usize) -> Result<Step<Self>> {
        self.t += 1;
        let is_done = self.t >= self.config.episode_len;
        Ok(Step::new(
            vec![self.t as f32; self.config.obs_dim],
            self.config.reward,
            is_done,
            (),
        ))
    }
}

/// Value estimator returning one constant row of per-action values.
///
/// An update overwrites the row with the column means of the given targets
/// and returns the mean squared error before the overwrite, so parameters
/// observably change on every update.
#[derive(Clone, Debug, PartialEq)]
pub struct DummyEstimator {
    /// Per-action values returned for any observation.
    pub values: Vec<f32>,

    /// Number of updates performed.
    pub n_updates: usize,

    /// Targets of the most recent update.
    pub last_targets: Option<Vec<Vec<f32>>>,
}

impl DummyEstimator {
    /// Constructs the estimator with the given per-action values.
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            n_updates: 0,
            last_targets: None,
        }
    }
}

impl ValueEstimator for DummyEstimator {
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        Ok(obs.iter().map(|_| self.values.clone()).collect())
    }

    fn update(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<f32> {
        let n = obs.len() as f32;
        let loss = targets
            .iter()
            .flat_map(|row| {
                row.iter()
                    .zip(self.values.iter())
                    .map(|(t, v)| (t - v) * (t - v))
            })
            .sum::<f32>()
            / (n * self.values.len() as f32);

        for (j, v) in self.values.iter_mut().enumerate() {
            *v = targets.iter().map(|row| row[j]).sum::<f32>() / n;
        }
        self.n_updates += 1;
        self.last_targets = Some(targets.to_vec());
        Ok(loss)
    }

    fn copy_params_from(&mut self, src: &Self) -> Result<()> {
        self.values = src.values.clone();
        Ok(())
    }

    fn save(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn load(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
