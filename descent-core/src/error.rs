//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum DescentError {
    /// The replay buffer holds fewer transitions than requested.
    #[error("requested a batch of {requested} transitions, buffer holds {len}")]
    InsufficientData {
        /// Requested mini-batch size.
        requested: usize,
        /// Number of transitions currently stored.
        len: usize,
    },

    /// A configuration value from which no working component can be built.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
