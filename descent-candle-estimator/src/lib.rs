#![warn(missing_docs)]
//! Value estimator for Descent implemented with
//! [candle](https://crates.io/crates/candle-core).
//!
//! [`MlpEstimator`] implements [`descent_core::ValueEstimator`] with a
//! multilayer perceptron whose parameters live in a
//! [`candle_nn::VarMap`]. Two instances with the same configuration form the
//! online/target pair of a [`Ddqn`](descent_core::Ddqn) agent.
mod estimator;
pub mod mlp;
pub mod opt;
pub mod util;

use serde::{Deserialize, Serialize};

pub use estimator::{MlpEstimator, MlpEstimatorConfig};
pub use mlp::{Mlp, MlpConfig};
pub use opt::{Optimizer, OptimizerConfig};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support
/// serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl From<Device> for candle_core::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => candle_core::Device::Cpu,
            Device::Cuda(n) => {
                candle_core::Device::new_cuda(n).expect("failed to create the CUDA device")
            }
        }
    }
}
