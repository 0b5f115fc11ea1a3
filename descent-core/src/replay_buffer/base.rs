//! Ring-buffer implementation of the replay memory.
use super::{ReplayBufferConfig, Transition, TransitionBatch};
use crate::error::DescentError;
use rand::{rngs::StdRng, SeedableRng};

/// A bounded FIFO collection of [`Transition`]s.
///
/// Storage is column-oriented with a ring cursor: `i` is the next slot to be
/// written and wraps at `capacity`, so a push into a full buffer discards the
/// oldest entry. The buffer owns its sampling RNG, seeded from the
/// configuration for reproducibility.
pub struct ReplayBuffer {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Current insertion index.
    i: usize,

    /// Current number of stored transitions.
    size: usize,

    /// Storage for observations.
    obs: Vec<Vec<f32>>,

    /// Storage for actions.
    act: Vec<u32>,

    /// Storage for next observations.
    next_obs: Vec<Vec<f32>>,

    /// Storage for rewards.
    reward: Vec<f32>,

    /// Storage for termination flags.
    is_terminated: Vec<i8>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl ReplayBuffer {
    /// Creates a new replay buffer with the given configuration.
    ///
    /// Fails with [`DescentError::InvalidConfig`] on a zero capacity.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self, DescentError> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity,
            i: 0,
            size: 0,
            obs: vec![Vec::new(); config.capacity],
            act: vec![0; config.capacity],
            next_obs: vec![Vec::new(); config.capacity],
            reward: vec![0.; config.capacity],
            is_terminated: vec![0; config.capacity],
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Adds a transition to the buffer, evicting the oldest one when full.
    pub fn push(&mut self, tr: Transition) {
        self.obs[self.i] = tr.obs;
        self.act[self.i] = tr.act;
        self.next_obs[self.i] = tr.next_obs;
        self.reward[self.i] = tr.reward;
        self.is_terminated[self.i] = tr.is_terminated as i8;
        self.i = (self.i + 1) % self.capacity;
        if self.size < self.capacity {
            self.size += 1;
        }
    }

    /// Returns the current number of transitions in the buffer.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` when the buffer holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the maximum number of transitions the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples a mini-batch of `size` distinct transitions uniformly at
    /// random.
    ///
    /// Fails with [`DescentError::InsufficientData`] when fewer than `size`
    /// transitions are stored. Sampling copies the selected transitions and
    /// leaves the buffer contents unchanged.
    pub fn batch(&mut self, size: usize) -> Result<TransitionBatch, DescentError> {
        if size > self.size {
            return Err(DescentError::InsufficientData {
                requested: size,
                len: self.size,
            });
        }
        let ixs = rand::seq::index::sample(&mut self.rng, self.size, size).into_vec();

        Ok(TransitionBatch {
            obs: ixs.iter().map(|&ix| self.obs[ix].clone()).collect(),
            act: ixs.iter().map(|&ix| self.act[ix]).collect(),
            next_obs: ixs.iter().map(|&ix| self.next_obs[ix].clone()).collect(),
            reward: ixs.iter().map(|&ix| self.reward[ix]).collect(),
            is_terminated: ixs.iter().map(|&ix| self.is_terminated[ix]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(id: f32) -> Transition {
        Transition {
            obs: vec![id],
            act: id as u32,
            reward: id,
            next_obs: vec![id + 1.0],
            is_terminated: false,
        }
    }

    fn build(capacity: usize) -> ReplayBuffer {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity)).unwrap()
    }

    #[test]
    fn size_is_bounded_by_capacity() {
        let mut buffer = build(3);
        for k in 0..10 {
            buffer.push(transition(k as f32));
            assert!(buffer.len() <= 3);
        }
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn full_buffer_evicts_oldest_first() {
        let mut buffer = build(3);
        for k in 0..5 {
            buffer.push(transition(k as f32));
        }
        // 5 pushes into capacity 3: transitions 2, 3, 4 remain.
        let mut remaining = buffer.reward.clone();
        remaining.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(remaining, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn batch_on_small_buffer_fails_without_mutation() {
        let mut buffer = build(8);
        buffer.push(transition(0.0));
        buffer.push(transition(1.0));
        let before = (buffer.obs.clone(), buffer.reward.clone(), buffer.len());

        match buffer.batch(3) {
            Err(DescentError::InsufficientData { requested, len }) => {
                assert_eq!((requested, len), (3, 2));
            }
            _ => panic!("expected InsufficientData"),
        }
        assert_eq!(before, (buffer.obs.clone(), buffer.reward.clone(), buffer.len()));
    }

    #[test]
    fn batch_returns_distinct_stored_transitions() {
        let mut buffer = build(8);
        for k in 0..5 {
            buffer.push(transition(k as f32));
        }
        let batch = buffer.batch(5).unwrap();
        assert_eq!(batch.len(), 5);

        let mut rewards = batch.reward.clone();
        rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(rewards, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        for (obs, reward) in batch.obs.iter().zip(batch.reward.iter()) {
            assert_eq!(obs, &vec![*reward]);
        }
    }
}
