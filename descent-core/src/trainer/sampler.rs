//! Environment interaction and episode accounting.
use crate::{
    base::{Env, ValueEstimator},
    dqn::Ddqn,
    replay_buffer::{ReplayBuffer, Transition},
};
use anyhow::Result;

/// Totals of a completed episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of rewards over the episode.
    pub total_reward: f32,

    /// Number of environment steps in the episode.
    pub steps: usize,
}

/// Draws transitions from the environment and pushes them into a replay
/// buffer.
///
/// Keeps the previous observation between calls and accumulates the reward
/// and step count of the running episode; both accumulators are reset to
/// zero when the episode ends.
pub struct Sampler<E: Env> {
    env: E,
    prev_obs: Option<Vec<f32>>,
    episode_reward: f32,
    episode_steps: usize,
}

impl<E: Env> Sampler<E> {
    /// Creates a sampler around the given environment.
    pub fn new(env: E) -> Self {
        Self {
            env,
            prev_obs: None,
            episode_reward: 0.0,
            episode_steps: 0,
        }
    }

    /// Performs one environment step and pushes the transition.
    ///
    /// The environment is reset lazily at the first call and after every
    /// terminated episode. Returns the episode totals when this step ended
    /// the episode.
    pub fn sample_and_push<Q: ValueEstimator>(
        &mut self,
        agent: &mut Ddqn<Q>,
        buffer: &mut ReplayBuffer,
    ) -> Result<Option<EpisodeSummary>> {
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => self.env.reset()?,
        };

        let act = agent.sample(&obs)?;
        let step = self.env.step(act)?;
        self.episode_reward += step.reward;
        self.episode_steps += 1;

        buffer.push(Transition {
            obs,
            act: act as u32,
            reward: step.reward,
            next_obs: step.obs.clone(),
            is_terminated: step.is_done,
        });

        if step.is_done {
            let summary = EpisodeSummary {
                total_reward: self.episode_reward,
                steps: self.episode_steps,
            };
            self.episode_reward = 0.0;
            self.episode_steps = 0;
            Ok(Some(summary))
        } else {
            self.prev_obs = Some(step.obs);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dqn::{Ddqn, DdqnConfig},
        dummy::{DummyEnv, DummyEnvConfig, DummyEstimator},
        replay_buffer::ReplayBufferConfig,
        Env,
    };

    #[test]
    fn episode_totals_accumulate_and_reset() {
        let env_config = DummyEnvConfig {
            episode_len: 3,
            reward: 2.0,
            ..Default::default()
        };
        let mut sampler = Sampler::new(DummyEnv::build(&env_config, 0).unwrap());
        let mut agent = Ddqn::build(
            DdqnConfig::default(),
            DummyEstimator::new(vec![0.0, 0.0]),
            DummyEstimator::new(vec![0.0, 0.0]),
        )
        .unwrap();
        let mut buffer =
            ReplayBuffer::build(&ReplayBufferConfig::default().capacity(16)).unwrap();

        for _ in 0..2 {
            assert_eq!(sampler.sample_and_push(&mut agent, &mut buffer).unwrap(), None);
        }
        let summary = sampler
            .sample_and_push(&mut agent, &mut buffer)
            .unwrap()
            .unwrap();
        assert_eq!(summary, EpisodeSummary { total_reward: 6.0, steps: 3 });

        // Accumulators start over with the next episode.
        assert_eq!(sampler.sample_and_push(&mut agent, &mut buffer).unwrap(), None);
        assert_eq!(sampler.episode_steps, 1);
        assert_eq!(sampler.episode_reward, 2.0);
        assert_eq!(buffer.len(), 4);
    }
}
