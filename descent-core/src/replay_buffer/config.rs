//! Configuration of the replay buffer.
use crate::error::DescentError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReplayBuffer`](super::ReplayBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayBufferConfig {
    /// Maximum number of transitions that can be stored in the buffer.
    /// When the buffer is full, new transitions replace the oldest ones.
    pub capacity: usize,

    /// Random seed used for sampling transitions.
    pub seed: u64,
}

impl Default for ReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Constructs [`ReplayBufferConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReplayBufferConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), DescentError> {
        if self.capacity == 0 {
            return Err(DescentError::InvalidConfig(
                "replay buffer capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn rejects_zero_capacity() {
        assert!(ReplayBufferConfig::default().capacity(0).validate().is_err());
        assert!(ReplayBufferConfig::default().capacity(1).validate().is_ok());
    }

    #[test]
    fn yaml_roundtrip() -> Result<()> {
        let config = ReplayBufferConfig::default().capacity(512).seed(7);
        let dir = TempDir::new("replay_buffer_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        assert_eq!(ReplayBufferConfig::load(&path)?, config);
        Ok(())
    }
}
