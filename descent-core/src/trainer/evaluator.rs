//! Evaluate trained agents.
use crate::{
    base::{Env, ValueEstimator},
    dqn::Ddqn,
};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes under the agent's current policy and
/// collects the per-episode returns.
///
/// The evaluator builds its own environment instance, so evaluation never
/// disturbs the state or random stream of the training environment. The
/// caller is responsible for putting the agent into evaluation mode first.
pub struct Evaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> {
    /// Constructs a new [`Evaluator`].
    ///
    /// * `config` - Configuration of the environment.
    /// * `seed` - Random seed for the environment instance.
    /// * `n_episodes` - Number of episodes to run per evaluation.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Runs the evaluation episodes and returns their returns.
    pub fn evaluate<Q: ValueEstimator>(&mut self, agent: &mut Ddqn<Q>) -> Result<Vec<f32>> {
        let mut rs = Vec::with_capacity(self.n_episodes);

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset()?;
            let mut r_total = 0.0;

            loop {
                let act = agent.sample(&prev_obs)?;
                let step = self.env.step(act)?;
                r_total += step.reward;
                if step.is_done {
                    break;
                }
                prev_obs = step.obs;
            }

            info!("evaluation episode {} | return {:.1}", ix + 1, r_total);
            rs.push(r_total);
        }

        Ok(rs)
    }
}
