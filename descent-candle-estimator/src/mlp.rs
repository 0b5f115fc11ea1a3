//! Multilayer perceptron.
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`].
pub struct MlpConfig {
    /// Dimensionality of the input (observation) vector.
    pub in_dim: i64,

    /// Widths of the hidden layers.
    pub units: Vec<i64>,

    /// Dimensionality of the output (one value per action).
    pub out_dim: i64,
}

impl MlpConfig {
    /// Creates configuration of the MLP.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
        }
    }
}

/// Returns a vector of linear modules from [`MlpConfig`].
fn create_linear_layers(prefix: &str, vs: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let mut dims = vec![config.in_dim];
    dims.extend_from_slice(&config.units);
    dims.push(config.out_dim);
    let vs = vs.pp(prefix);

    let mut layers = Vec::with_capacity(dims.len() - 1);
    for (i, w) in dims.windows(2).enumerate() {
        layers.push(linear(w[0] as _, w[1] as _, vs.pp(format!("ln{}", i)))?);
    }
    Ok(layers)
}

fn mlp_forward(xs: Tensor, layers: &[Linear]) -> Result<Tensor, candle_core::Error> {
    let n_layers = layers.len();
    let mut xs = xs;

    for layer in layers.iter().take(n_layers - 1) {
        xs = layer.forward(&xs)?.relu()?;
    }

    layers[n_layers - 1].forward(&xs)
}

/// Multilayer perceptron with ReLU activations on the hidden layers and a
/// linear output layer.
pub struct Mlp {
    device: Device,
    layers: Vec<Linear>,
}

impl Mlp {
    /// Builds the perceptron with variables registered under `vs`.
    pub fn build(vs: VarBuilder, config: &MlpConfig) -> Result<Self> {
        let device = vs.device().clone();
        let layers = create_linear_layers("mlp", vs, config)?;

        Ok(Self { device, layers })
    }

    /// Forward pass, `(batch, in_dim)` to `(batch, out_dim)`.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor, candle_core::Error> {
        let xs = xs.to_device(&self.device)?;
        mlp_forward(xs, &self.layers)
    }
}
