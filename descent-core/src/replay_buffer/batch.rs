//! Transitions and mini-batches.

/// One observed step of interaction.
///
/// Produced once per environment step and stored by value; never mutated
/// after creation. `is_terminated` marks the transition that ended its
/// episode, so no future value is bootstrapped across it.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation before the step.
    pub obs: Vec<f32>,

    /// Action taken.
    pub act: u32,

    /// Immediate reward.
    pub reward: f32,

    /// Observation after the step.
    pub next_obs: Vec<f32>,

    /// Whether the episode ended with this step.
    pub is_terminated: bool,
}

/// A column-oriented set of transitions used for one learning update.
pub struct TransitionBatch {
    /// Observations.
    pub obs: Vec<Vec<f32>>,

    /// Actions.
    pub act: Vec<u32>,

    /// Next observations.
    pub next_obs: Vec<Vec<f32>>,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Termination flags, 1 where the episode ended.
    pub is_terminated: Vec<i8>,
}

impl TransitionBatch {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` for a batch without transitions.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}
