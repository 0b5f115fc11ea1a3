//! Replay buffer storing a bounded history of transitions.
//!
//! The buffer is a fixed-capacity ring: once full, every push overwrites the
//! oldest slot. Mini-batches are drawn uniformly at random without
//! replacement from the stored transitions; sampling never mutates the
//! contents.
//!
//! ```rust
//! use descent_core::replay_buffer::{ReplayBuffer, ReplayBufferConfig, Transition};
//!
//! let config = ReplayBufferConfig::default().capacity(100).seed(42);
//! let mut buffer = ReplayBuffer::build(&config).unwrap();
//! buffer.push(Transition {
//!     obs: vec![0.0, 0.0],
//!     act: 1,
//!     reward: -1.0,
//!     next_obs: vec![0.1, 0.0],
//!     is_terminated: false,
//! });
//! assert!(buffer.batch(2).is_err());
//! ```
mod base;
mod batch;
mod config;

pub use base::ReplayBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::ReplayBufferConfig;
