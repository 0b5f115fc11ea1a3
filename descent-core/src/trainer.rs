//! Train [`Ddqn`] agents.
mod config;
mod evaluator;
mod history;
mod sampler;

use crate::{
    base::{Env, ValueEstimator},
    dqn::Ddqn,
    error::DescentError,
    record::{Record, RecordValue::Scalar, Recorder},
    replay_buffer::{ReplayBuffer, ReplayBufferConfig},
};
use anyhow::Result;
pub use config::TrainerConfig;
pub use evaluator::Evaluator;
pub use history::{EpisodeRecord, TrainingHistory};
use log::info;
pub use sampler::{EpisodeSummary, Sampler};
use std::path::Path;

/// Phases of the training loop.
///
/// The loop moves forward through these phases only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Collecting transitions until one mini-batch fits; actions follow the
    /// exploration policy, no learning update is attempted.
    Warmup,

    /// Normal operation: act, store, learn each step, refresh the target
    /// estimator periodically.
    Training,

    /// The success criterion has been met; learning and exploration decay
    /// stopped, the policy is greedy from here on.
    Solved,

    /// Greedy episodes confirming the solved behavior.
    Evaluating,
}

/// Outcome of a training run.
#[derive(Debug)]
pub struct TrainingReport {
    /// Per-episode totals of the training episodes.
    pub history: TrainingHistory,

    /// Returns of the greedy confirmation episodes; empty when the run ended
    /// at the episode cap instead of solving the task.
    pub eval_returns: Vec<f32>,

    /// Phase in which the loop terminated.
    pub phase: Phase,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and related objects.
///
/// # Training loop
///
/// 0. Given an agent ([`Ddqn`]) and a recorder implementing [`Recorder`].
/// 1. Build the environment from its configuration and the replay buffer
///    from [`ReplayBufferConfig`]; wrap the environment in a [`Sampler`].
/// 2. Each iteration performs one environment step: the sampler asks the
///    agent for an action, applies it, pushes the resulting transition into
///    the buffer and accumulates the episode totals.
/// 3. The agent then attempts one learning update. While the buffer holds
///    fewer transitions than one mini-batch this is a silent no-op and the
///    loop stays in [`Phase::Warmup`].
/// 4. When an episode completes, its totals and the current exploration
///    probability are appended to the [`TrainingHistory`], a one-line
///    summary is logged and a record written to the recorder.
/// 5. Once the trailing mean reward over the last `solved_window` episodes
///    exceeds `solved_threshold` (with a full window), the loop enters
///    [`Phase::Solved`]: the agent switches to the greedy evaluation mode,
///    its parameters are saved if a model directory is configured and
///    training stops.
/// 6. `eval_episodes` additional episodes are then run through an
///    [`Evaluator`] owning its own environment instance and counted
///    separately from the training episodes.
/// 7. The loop also terminates when `max_episodes` training episodes
///    completed without solving the task.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Ddqn]-->|action|B[Env]
///     B -->|observation, reward|A
///     B -->|Transition|C[ReplayBuffer]
///     C -->|TransitionBatch|A
/// ```
pub struct Trainer<E: Env> {
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: ReplayBufferConfig,

    /// The maximal number of training episodes.
    max_episodes: usize,

    /// Number of greedy confirmation episodes.
    eval_episodes: usize,

    /// Success threshold on the trailing mean reward.
    solved_threshold: f32,

    /// Length of the trailing window.
    solved_window: usize,

    /// Where to save the agent parameters.
    model_dir: Option<String>,

    /// Where to save the per-episode results.
    results_dir: Option<String>,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer.
    ///
    /// Both configurations are validated; a malformed value fails the
    /// construction and nothing is partially built.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        replay_buffer_config: ReplayBufferConfig,
    ) -> Result<Self> {
        config.validate()?;
        replay_buffer_config.validate()?;

        Ok(Self {
            env_config,
            replay_buffer_config,
            max_episodes: config.max_episodes,
            eval_episodes: config.eval_episodes,
            solved_threshold: config.solved_threshold,
            solved_window: config.solved_window,
            model_dir: config.model_dir,
            results_dir: config.results_dir,
        })
    }

    /// Train the agent.
    pub fn train<Q: ValueEstimator>(
        &mut self,
        agent: &mut Ddqn<Q>,
        recorder: &mut dyn Recorder,
    ) -> Result<TrainingReport> {
        if agent.batch_size() > self.replay_buffer_config.capacity {
            return Err(DescentError::InvalidConfig(format!(
                "batch size {} exceeds replay buffer capacity {}",
                agent.batch_size(),
                self.replay_buffer_config.capacity
            ))
            .into());
        }

        let env = E::build(&self.env_config, 0)?;
        info!(
            "environment with {} observation dimensions and {} actions",
            env.obs_dim(),
            env.n_actions()
        );
        let mut buffer = ReplayBuffer::build(&self.replay_buffer_config)?;
        let mut sampler = Sampler::new(env);
        let mut history = TrainingHistory::new();
        let mut phase = Phase::Warmup;
        agent.train();

        while history.n_episodes() < self.max_episodes && phase != Phase::Solved {
            let summary = sampler.sample_and_push(agent, &mut buffer)?;
            let opt_record = agent.opt(&mut buffer)?;
            if phase == Phase::Warmup && opt_record.is_some() {
                phase = Phase::Training;
            }

            let summary = match summary {
                Some(summary) => summary,
                None => continue,
            };

            let eps = agent.eps() as f32;
            history.push(summary.total_reward, summary.steps, eps);
            let mean_reward = history.trailing_mean_reward(self.solved_window);
            let mean_steps = history.trailing_mean_steps(self.solved_window);
            info!(
                "episode {} | mean steps {:.1} | mean reward {:.1} | eps {:.3}",
                history.n_episodes(),
                mean_steps,
                mean_reward,
                eps
            );

            let mut record = Record::from_slice(&[
                ("episode", Scalar(history.n_episodes() as f32)),
                ("steps", Scalar(summary.steps as f32)),
                ("reward", Scalar(summary.total_reward)),
                ("mean_reward", Scalar(mean_reward)),
                ("eps", Scalar(eps)),
            ]);
            if let Some(opt_record) = opt_record {
                record = record.merge(opt_record);
            }
            recorder.write(record);

            if phase == Phase::Training
                && history.n_episodes() >= self.solved_window
                && mean_reward > self.solved_threshold
            {
                phase = Phase::Solved;
                info!(
                    "solved after {} episodes | mean reward {:.1}",
                    history.n_episodes(),
                    mean_reward
                );
                agent.eval();
                if let Some(model_dir) = &self.model_dir {
                    agent.save_params(Path::new(model_dir))?;
                }
            }
        }

        // Greedy confirmation episodes, counted separately.
        let eval_returns = if phase == Phase::Solved && self.eval_episodes > 0 {
            phase = Phase::Evaluating;
            agent.eval();
            let mut evaluator = Evaluator::<E>::new(&self.env_config, 1, self.eval_episodes)?;
            let returns = evaluator.evaluate(agent)?;
            for (ix, r) in returns.iter().enumerate() {
                recorder.write(Record::from_slice(&[
                    ("eval_episode", Scalar((ix + 1) as f32)),
                    ("eval_reward", Scalar(*r)),
                ]));
            }
            returns
        } else {
            Vec::new()
        };

        if let Some(results_dir) = &self.results_dir {
            history.save(results_dir)?;
        }

        Ok(TrainingReport {
            history,
            eval_returns,
            phase,
        })
    }
}
