#![warn(missing_docs)]
//! A library for training double deep Q-network agents.
//!
//! The crate is backend-agnostic: the value function is an implementation of
//! the [`ValueEstimator`] trait and the simulated system an implementation of
//! [`Env`]. Everything else lives here, in dependency order:
//!
//! * [`replay_buffer`]: a bounded ring buffer of [`Transition`]s with
//!   uniform mini-batch sampling.
//! * [`Ddqn`]: the agent, with ε-greedy action selection on a linearly
//!   decaying schedule, double-Q learning updates and periodic hard
//!   refreshes of the target estimator.
//! * [`Trainer`]: the loop driving agent and environment until the success
//!   criterion is met, with episode bookkeeping, progress recording and
//!   result persistence.
//!
//! [`Transition`]: replay_buffer::Transition
pub mod dummy;
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{Env, Info, Step, ValueEstimator};

mod dqn;
pub use dqn::{Ddqn, DdqnConfig, EpsilonGreedy};

mod trainer;
pub use trainer::{
    EpisodeRecord, EpisodeSummary, Evaluator, Phase, Sampler, Trainer, TrainerConfig,
    TrainingHistory, TrainingReport,
};
