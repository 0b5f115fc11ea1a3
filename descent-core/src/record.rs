//! Types and traits for recording training progress.
//!
//! A [`Record`] is a string-keyed set of values produced somewhere in the
//! training loop; a [`Recorder`] is the destination it is written to. The
//! [`Trainer`](crate::Trainer) writes one record per completed episode and
//! one per evaluation episode.
//!
//! ```rust
//! use descent_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(1.0));
//! record.insert("reward", RecordValue::Scalar(-7.5));
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
