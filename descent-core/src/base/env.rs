//! Environment.
use anyhow::Result;

/// Additional information attached to an environment step.
pub trait Info {}

impl Info for () {}

/// Represents an observation, reward and termination flag emitted by the
/// environment after applying an action.
pub struct Step<E: Env> {
    /// Observation after the step.
    pub obs: Vec<f32>,

    /// Reward of the step.
    pub reward: f32,

    /// Flag denoting if the episode ended with this step.
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: Vec<f32>, reward: f32, is_done: bool, info: E::Info) -> Self {
        Step {
            obs,
            reward,
            is_done,
            info,
        }
    }
}

/// Represents an environment, typically an MDP with a fixed observation
/// dimensionality and a discrete action set.
///
/// The training loop consumes this interface; it neither owns nor constructs
/// the concrete simulation. Implementations are expected to be deterministic
/// given the seed passed to [`Env::build`].
pub trait Env: Sized {
    /// Configuration of the environment.
    type Config: Clone;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>;

    /// Dimensionality of the observation vector.
    fn obs_dim(&self) -> usize;

    /// Number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Performs an environment step.
    ///
    /// Actions outside `0..n_actions()` are the environment's responsibility
    /// to reject; the resulting error is propagated unmodified.
    fn step(&mut self, act: usize) -> Result<Step<Self>>;
}
