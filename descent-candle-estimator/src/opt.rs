//! Optimizers for the value estimator.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer updating the estimator parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// AdamW optimizer; `weight_decay` is the L2 regularization strength.
    AdamW {
        /// Learning rate.
        lr: f64,

        /// Decoupled weight decay.
        #[serde(default = "default_weight_decay")]
        weight_decay: f64,
    },

    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Builds an optimizer over the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::AdamW { lr, weight_decay } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    weight_decay: *weight_decay,
                    ..ParamsAdamW::default()
                };
                let opt = AdamW::new(vars, params)?;
                Ok(Optimizer::AdamW(opt))
            }
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                let opt = Adam::new(vars, params)?;
                Ok(Optimizer::Adam(opt))
            }
        }
    }

    /// Overrides the learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::AdamW { weight_decay, .. } => Self::AdamW { lr, weight_decay },
            Self::Adam { .. } => Self::Adam { lr },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let params = ParamsAdamW::default();
        Self::AdamW {
            lr: params.lr,
            weight_decay: params.weight_decay,
        }
    }
}

/// Thin wrapper of the candle optimizers.
pub enum Optimizer {
    /// AdamW optimizer.
    AdamW(AdamW),

    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Computes the gradients of `loss` and applies one optimization step.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::AdamW(opt) => Ok(opt.backward_step(loss)?),
            Self::Adam(opt) => Ok(opt.backward_step(loss)?),
        }
    }
}
