//! Agent implementation.
use super::{argmax, DdqnConfig, EpsilonGreedy};
use crate::{
    base::ValueEstimator,
    record::{Record, RecordValue},
    replay_buffer::{ReplayBuffer, TransitionBatch},
};
use anyhow::Result;
use rand::{rngs::SmallRng, SeedableRng};
use std::path::Path;

/// Double deep Q-network agent.
///
/// Owns two independently parameterized instances of one estimator: `qnet`
/// is updated by gradient descent every learning step, `qnet_tgt` is a
/// periodic snapshot of `qnet` used only to evaluate bootstrapped targets.
/// The defining property of the double-Q update is that the action of the
/// bootstrap is *selected* by the online estimator and *evaluated* by the
/// target estimator, which bounds the overestimation bias of plain
/// Q-learning.
///
/// In training mode, action selection is ε-greedy and every call advances
/// the decay schedule; in evaluation mode the policy is purely greedy and
/// the schedule is frozen.
pub struct Ddqn<Q: ValueEstimator> {
    qnet: Q,
    qnet_tgt: Q,
    explorer: EpsilonGreedy,
    batch_size: usize,
    discount_factor: f64,
    sync_interval: usize,
    sync_counter: usize,
    env_steps: usize,
    n_opts: usize,
    train: bool,
    rng: SmallRng,
}

impl<Q: ValueEstimator> Ddqn<Q> {
    /// Constructs the agent.
    ///
    /// The parameters of `qnet` are copied into `qnet_tgt`, so the target
    /// estimator starts as a snapshot of the online one. The configuration
    /// is validated first; a malformed value fails the construction.
    pub fn build(config: DdqnConfig, qnet: Q, mut qnet_tgt: Q) -> Result<Self> {
        config.validate()?;
        qnet_tgt.copy_params_from(&qnet)?;

        Ok(Self {
            qnet,
            qnet_tgt,
            explorer: config.explorer,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            sync_interval: config.sync_interval,
            sync_counter: 0,
            env_steps: 0,
            n_opts: 0,
            train: true,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Set the agent to training mode.
    pub fn train(&mut self) {
        self.train = true;
    }

    /// Set the agent to evaluation mode, freezing the exploration schedule.
    pub fn eval(&mut self) {
        self.train = false;
    }

    /// Return if it is in training mode.
    pub fn is_train(&self) -> bool {
        self.train
    }

    /// Mini-batch size of the learning updates.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Current exploration probability.
    pub fn eps(&self) -> f64 {
        self.explorer.eps()
    }

    /// Total number of action selections made in training mode.
    pub fn env_steps(&self) -> usize {
        self.env_steps
    }

    /// Number of learning updates performed.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Samples an action for the given observation.
    pub fn sample(&mut self, obs: &[f32]) -> Result<usize> {
        let values = self.qnet.predict_one(obs)?;
        let act = if self.train {
            self.env_steps += 1;
            self.sync_counter += 1;
            self.explorer.action(&values, &mut self.rng)
        } else {
            argmax(&values)
        };
        Ok(act)
    }

    /// One double-Q learning update on a freshly sampled mini-batch.
    fn update_critic(&mut self, buffer: &mut ReplayBuffer) -> Result<f32> {
        let TransitionBatch {
            obs,
            act,
            next_obs,
            reward,
            is_terminated,
        } = buffer.batch(self.batch_size)?;

        // Selection by the online estimator, evaluation by the target.
        let q_next = self.qnet.predict(&next_obs)?;
        let q_next_tgt = self.qnet_tgt.predict(&next_obs)?;

        // Targets equal the current predictions except at the taken actions,
        // so untaken actions carry no gradient.
        let mut targets = self.qnet.predict(&obs)?;
        for k in 0..targets.len() {
            let a_next = argmax(&q_next[k]);
            let continues = 1.0 - is_terminated[k] as f64;
            let value = reward[k] as f64
                + continues * self.discount_factor * q_next_tgt[k][a_next] as f64;
            targets[k][act[k] as usize] = value as f32;
        }

        self.qnet.update(&obs, &targets)
    }

    /// Performs a learning update if enough transitions are stored.
    ///
    /// Returns `None`, without touching any parameters, while the buffer
    /// holds fewer transitions than one mini-batch. Otherwise one update of
    /// the online estimator is performed and, every `sync_interval` total
    /// environment steps, the target estimator is overwritten with a full
    /// copy of the online parameters.
    pub fn opt(&mut self, buffer: &mut ReplayBuffer) -> Result<Option<Record>> {
        if buffer.len() < self.batch_size {
            return Ok(None);
        }

        let loss = self.update_critic(buffer)?;
        self.n_opts += 1;

        if self.sync_counter >= self.sync_interval {
            self.sync_counter = 0;
            self.qnet_tgt.copy_params_from(&self.qnet)?;
        }

        Ok(Some(Record::from_slice(&[(
            "loss",
            RecordValue::Scalar(loss),
        )])))
    }

    /// Save the parameters of both estimators in the given directory.
    pub fn save_params(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        self.qnet.save(&path.join("qnet.safetensors"))?;
        self.qnet_tgt.save(&path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }

    /// Load the parameters of both estimators from the given directory.
    pub fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(&path.join("qnet.safetensors"))?;
        self.qnet_tgt.load(&path.join("qnet_tgt.safetensors"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::DummyEstimator,
        replay_buffer::{ReplayBufferConfig, Transition},
    };

    fn transition(reward: f32, act: u32, is_terminated: bool) -> Transition {
        Transition {
            obs: vec![0.0, 0.0],
            act,
            reward,
            next_obs: vec![1.0, 1.0],
            is_terminated,
        }
    }

    fn buffer_with(capacity: usize, transitions: Vec<Transition>) -> ReplayBuffer {
        let mut buffer =
            ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity)).unwrap();
        for tr in transitions {
            buffer.push(tr);
        }
        buffer
    }

    fn agent(batch_size: usize, sync_interval: usize) -> Ddqn<DummyEstimator> {
        let config = DdqnConfig::default()
            .batch_size(batch_size)
            .discount_factor(0.5)
            .sync_interval(sync_interval);
        Ddqn::build(
            config,
            DummyEstimator::new(vec![0.0, 1.0]),
            DummyEstimator::new(vec![0.0, 0.0]),
        )
        .unwrap()
    }

    #[test]
    fn opt_is_a_no_op_until_one_batch_fits() {
        let mut agent = agent(4, 1000);
        let mut buffer = buffer_with(10, (0..3).map(|_| transition(1.0, 0, false)).collect());

        let record = agent.opt(&mut buffer).unwrap();
        assert!(record.is_none());
        assert_eq!(agent.qnet.n_updates, 0);
        assert_eq!(agent.n_opts(), 0);

        buffer.push(transition(1.0, 0, false));
        buffer.push(transition(1.0, 0, false));
        let record = agent.opt(&mut buffer).unwrap();
        assert!(record.unwrap().get_scalar("loss").is_ok());
        assert_eq!(agent.qnet.n_updates, 1);
        assert_eq!(agent.n_opts(), 1);
    }

    #[test]
    fn bootstrap_action_is_selected_online_and_evaluated_by_the_target() {
        let mut agent = agent(1, 1000);
        // Online favors action 1; the target values it at 7.
        agent.qnet_tgt.values = vec![5.0, 7.0];
        let mut buffer = buffer_with(10, vec![transition(1.0, 0, false)]);

        agent.opt(&mut buffer).unwrap();
        let targets = agent.qnet.last_targets.clone().unwrap();
        // target = reward + 0.5 * Q_tgt(argmax of online) = 1 + 0.5 * 7
        assert_eq!(targets, vec![vec![4.5, 1.0]]);
    }

    #[test]
    fn terminal_transitions_bootstrap_nothing() {
        let mut agent = agent(1, 1000);
        agent.qnet_tgt.values = vec![1e6, 1e6];
        let mut buffer = buffer_with(10, vec![transition(3.0, 1, true)]);

        agent.opt(&mut buffer).unwrap();
        let targets = agent.qnet.last_targets.clone().unwrap();
        assert_eq!(targets, vec![vec![0.0, 3.0]]);
    }

    #[test]
    fn target_refresh_follows_the_step_cadence() {
        let mut agent = agent(2, 3);
        let mut buffer = buffer_with(
            10,
            vec![transition(1.0, 0, false), transition(2.0, 1, false)],
        );

        for _ in 0..3 {
            agent.sample(&[0.0, 0.0]).unwrap();
        }
        agent.opt(&mut buffer).unwrap();
        // Third step: the target was just overwritten with the online state.
        assert_eq!(agent.qnet.values, agent.qnet_tgt.values);

        agent.sample(&[0.0, 0.0]).unwrap();
        agent.opt(&mut buffer).unwrap();
        // One more update without a refresh: the two drift apart again.
        assert_ne!(agent.qnet.values, agent.qnet_tgt.values);
    }

    #[test]
    fn eval_mode_is_greedy_and_frozen() {
        let mut agent = agent(2, 1000);
        agent.eval();
        let eps_before = agent.eps();
        for _ in 0..10 {
            let act = agent.sample(&[0.0, 0.0]).unwrap();
            assert_eq!(act, 1);
        }
        assert_eq!(agent.eps(), eps_before);
        assert_eq!(agent.env_steps(), 0);
    }

    #[test]
    fn build_snapshots_the_online_parameters() {
        let agent = agent(2, 1000);
        assert_eq!(agent.qnet.values, agent.qnet_tgt.values);
    }
}
