//! Core interfaces.
mod env;
mod estimator;
pub use env::{Env, Info, Step};
pub use estimator::ValueEstimator;
