//! Episode history and result persistence.
use anyhow::Result;
use serde::Serialize;
use std::{fs, path::Path};

/// One row of the persisted per-episode results.
///
/// The field names are the column headers of the results file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EpisodeRecord {
    /// Total reward of the episode.
    pub rewards: f32,

    /// Number of environment steps in the episode.
    pub steps: usize,

    /// Exploration probability when the episode ended.
    pub epsilon: f32,
}

/// Completed-episode records accumulated over a training run.
///
/// Records are appended when an episode terminates and read-only afterwards;
/// the trailing means drive both the progress summaries and the success
/// criterion.
#[derive(Debug, Default)]
pub struct TrainingHistory {
    episodes: Vec<EpisodeRecord>,
}

impl TrainingHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, rewards: f32, steps: usize, epsilon: f32) {
        self.episodes.push(EpisodeRecord {
            rewards,
            steps,
            epsilon,
        });
    }

    /// Number of completed episodes.
    pub fn n_episodes(&self) -> usize {
        self.episodes.len()
    }

    /// The recorded episodes, oldest first.
    pub fn episodes(&self) -> &[EpisodeRecord] {
        &self.episodes
    }

    /// Mean reward over the last `n` episodes (fewer if the history is
    /// shorter). Zero for an empty history.
    pub fn trailing_mean_reward(&self, n: usize) -> f32 {
        Self::mean(self.tail(n).iter().map(|e| e.rewards))
    }

    /// Mean step count over the last `n` episodes.
    pub fn trailing_mean_steps(&self, n: usize) -> f32 {
        Self::mean(self.tail(n).iter().map(|e| e.steps as f32))
    }

    fn tail(&self, n: usize) -> &[EpisodeRecord] {
        &self.episodes[self.episodes.len().saturating_sub(n)..]
    }

    fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
        let n = values.len();
        if n == 0 {
            return 0.0;
        }
        values.sum::<f32>() / n as f32
    }

    /// Writes the history as `episodes.csv` into the given directory,
    /// creating the directory if absent.
    ///
    /// One row per episode with columns `rewards`, `steps` and `epsilon`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        fs::create_dir_all(dir.as_ref())?;
        let mut wtr = csv::Writer::from_path(dir.as_ref().join("episodes.csv"))?;
        for episode in &self.episodes {
            wtr.serialize(episode)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn trailing_means_cover_the_window() {
        let mut history = TrainingHistory::new();
        for k in 0..5 {
            history.push(k as f32, k, 0.5);
        }
        assert_eq!(history.trailing_mean_reward(2), 3.5);
        assert_eq!(history.trailing_mean_steps(2), 3.5);
        // A window longer than the history falls back to all episodes.
        assert_eq!(history.trailing_mean_reward(100), 2.0);
        assert_eq!(TrainingHistory::new().trailing_mean_reward(10), 0.0);
    }

    #[test]
    fn save_creates_the_directory_and_the_csv() -> Result<()> {
        let mut history = TrainingHistory::new();
        history.push(10.0, 1, 0.05);
        history.push(-2.5, 7, 0.05);

        let dir = TempDir::new("history")?;
        let results_dir = dir.path().join("results").join("run0");
        history.save(&results_dir)?;

        let content = fs::read_to_string(results_dir.join("episodes.csv"))?;
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("rewards,steps,epsilon"));
        assert_eq!(lines.next(), Some("10.0,1,0.05"));
        assert_eq!(lines.next(), Some("-2.5,7,0.05"));
        Ok(())
    }
}
