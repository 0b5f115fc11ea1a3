//! MLP value estimator.
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::{Optimizer, OptimizerConfig},
    util::copy_vars,
    Device,
};
use anyhow::{bail, Context, Result};
use candle_core::{DType, Tensor};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use descent_core::{error::DescentError, ValueEstimator};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`MlpEstimator`].
pub struct MlpEstimatorConfig {
    pub(crate) mlp_config: Option<MlpConfig>,
    pub(crate) opt_config: OptimizerConfig,
}

impl Default for MlpEstimatorConfig {
    fn default() -> Self {
        Self {
            mlp_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl MlpEstimatorConfig {
    /// Sets the network configuration.
    pub fn mlp_config(mut self, v: MlpConfig) -> Self {
        self.mlp_config = Some(v);
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Overrides the learning rate of the optimizer configuration.
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.opt_config = self.opt_config.learning_rate(lr);
        self
    }

    /// Constructs [`MlpEstimatorConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MlpEstimatorConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value estimator backed by an [`Mlp`].
///
/// All parameters live in an owned [`VarMap`]; two estimators built from the
/// same configuration therefore never share storage, which is what the
/// online/target pair of an agent requires.
pub struct MlpEstimator {
    device: candle_core::Device,
    varmap: VarMap,
    mlp: Mlp,
    in_dim: usize,
    out_dim: usize,
    opt: Optimizer,
}

impl MlpEstimator {
    /// Builds the estimator on the given device.
    ///
    /// Fails fast on a missing network configuration or non-positive
    /// dimensions.
    pub fn build(config: MlpEstimatorConfig, device: Device) -> Result<Self> {
        let mlp_config = config.mlp_config.context("mlp_config is not set.")?;
        if mlp_config.in_dim <= 0 || mlp_config.out_dim <= 0 {
            return Err(DescentError::InvalidConfig(format!(
                "network dimensions must be positive, got in_dim {} and out_dim {}",
                mlp_config.in_dim, mlp_config.out_dim
            ))
            .into());
        }

        let device: candle_core::Device = device.into();
        let varmap = VarMap::new();
        let mlp = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb, &mlp_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            mlp,
            in_dim: mlp_config.in_dim as usize,
            out_dim: mlp_config.out_dim as usize,
            opt,
        })
    }

    fn obs_tensor(&self, obs: &[Vec<f32>]) -> Result<Tensor> {
        let mut data = Vec::with_capacity(obs.len() * self.in_dim);
        for row in obs {
            if row.len() != self.in_dim {
                bail!(
                    "observation of length {} does not match the input dimension {}",
                    row.len(),
                    self.in_dim
                );
            }
            data.extend_from_slice(row);
        }
        Ok(Tensor::from_vec(data, (obs.len(), self.in_dim), &self.device)?)
    }
}

impl ValueEstimator for MlpEstimator {
    fn predict(&self, obs: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if obs.is_empty() {
            return Ok(Vec::new());
        }
        let xs = self.obs_tensor(obs)?;
        Ok(self.mlp.forward(&xs)?.detach().to_vec2::<f32>()?)
    }

    fn update(&mut self, obs: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<f32> {
        if targets.len() != obs.len() {
            bail!(
                "got {} target rows for {} observations",
                targets.len(),
                obs.len()
            );
        }
        let mut data = Vec::with_capacity(targets.len() * self.out_dim);
        for row in targets {
            if row.len() != self.out_dim {
                bail!(
                    "target row of length {} does not match the output dimension {}",
                    row.len(),
                    self.out_dim
                );
            }
            data.extend_from_slice(row);
        }
        let tgt = Tensor::from_vec(data, (targets.len(), self.out_dim), &self.device)?;

        let xs = self.obs_tensor(obs)?;
        let pred = self.mlp.forward(&xs)?;
        let loss = mse(&pred, &tgt)?;
        self.opt.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn copy_params_from(&mut self, src: &Self) -> Result<()> {
        copy_vars(&self.varmap, &src.varmap)
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.varmap.save(path)?;
        info!("Saved the estimator parameters to {:?}", path);
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.varmap.load(path)?;
        info!("Loaded the estimator parameters from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn build() -> Result<MlpEstimator> {
        let config = MlpEstimatorConfig::default()
            .mlp_config(MlpConfig::new(3, vec![16], 2))
            .learning_rate(1e-2);
        MlpEstimator::build(config, Device::Cpu)
    }

    fn probes() -> Vec<Vec<f32>> {
        vec![vec![0.1, -0.2, 0.3], vec![1.0, 0.0, -1.0]]
    }

    #[test]
    fn build_rejects_a_missing_network_config() {
        assert!(MlpEstimator::build(MlpEstimatorConfig::default(), Device::Cpu).is_err());
    }

    #[test]
    fn copied_params_agree_until_one_side_updates() -> Result<()> {
        let mut online = build()?;
        let mut target = build()?;
        target.copy_params_from(&online)?;
        assert_eq!(online.predict(&probes())?, target.predict(&probes())?);

        // A gradient step on one instance must not leak into the other.
        let before = target.predict(&probes())?;
        let targets = online
            .predict(&probes())?
            .into_iter()
            .map(|row| row.into_iter().map(|v| v + 1.0).collect())
            .collect::<Vec<Vec<f32>>>();
        let loss = online.update(&probes(), &targets)?;
        assert!(loss.is_finite());

        assert_ne!(online.predict(&probes())?, target.predict(&probes())?);
        assert_eq!(target.predict(&probes())?, before);
        Ok(())
    }

    #[test]
    fn save_and_load_roundtrip() -> Result<()> {
        let online = build()?;
        let dir = TempDir::new("estimator")?;
        let path = dir.path().join("qnet.safetensors");
        online.save(&path)?;

        let mut restored = build()?;
        restored.load(&path)?;
        assert_eq!(online.predict(&probes())?, restored.predict(&probes())?);
        Ok(())
    }

    #[test]
    fn dimension_mismatches_are_rejected() -> Result<()> {
        let mut estimator = build()?;
        assert!(estimator.predict(&[vec![1.0, 2.0]]).is_err());
        assert!(estimator
            .update(&probes(), &[vec![0.0], vec![0.0]])
            .is_err());
        Ok(())
    }
}
