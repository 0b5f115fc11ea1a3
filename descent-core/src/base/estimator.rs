//! Value estimator.
use anyhow::{anyhow, Result};
use std::path::Path;

/// A trainable approximation of the action-value function.
///
/// The agent holds two independently owned instances of one implementation:
/// the online estimator, updated by gradient descent every learning step, and
/// the target estimator, which only ever receives point-in-time copies of the
/// online parameters through [`ValueEstimator::copy_params_from`]. The two
/// instances must never share parameter storage.
pub trait ValueEstimator {
    /// Returns one row of per-action value estimates for each observation.
    ///
    /// Pure with respect to the parameters; no side effect.
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;

    /// Per-action value estimates for a single observation.
    fn predict_one(&self, obs: &[f32]) -> Result<Vec<f32>> {
        self.predict(&[obs.to_vec()])?
            .pop()
            .ok_or_else(|| anyhow!("estimator returned no prediction row"))
    }

    /// Performs one gradient step minimizing the mean squared error between
    /// the predictions for `obs` and `targets`, and returns the loss.
    ///
    /// Callers pass targets equal to the current predictions everywhere
    /// except the entries of the taken actions, so untaken actions contribute
    /// zero gradient.
    fn update(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<f32>;

    /// Overwrites the parameters of `self` with a full copy of the
    /// parameters of `src`.
    ///
    /// This is a deep copy; subsequent updates of either instance must not
    /// affect the other.
    fn copy_params_from(&mut self, src: &Self) -> Result<()>;

    /// Saves the parameters to the given path.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the parameters from the given path.
    fn load(&mut self, path: &Path) -> Result<()>;
}
