use ndarray::Array1;

use crate::error::{HustingsError, Result};

/// A single stored transition: state, action, reward and next state, each a
/// fixed-width vector sized at buffer construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: Array1<f32>,
    pub reward: Array1<f32>,
    pub next_state: Array1<f32>,
}

/// Fixed-capacity circular store of transitions.
///
/// Slots are pre-allocated zeroed at construction. `add` writes at the
/// current cursor and advances it, wrapping to 0 at capacity; the oldest
/// entry is simply overwritten. Retrieval is by raw slot index - callers
/// typically align slots 1:1 with an agent index rather than sampling by
/// recency.
#[derive(Clone)]
pub struct ReplayBuffer {
    slots: Vec<Transition>,
    cursor: usize,
    state_size: usize,
    action_size: usize,
    reward_size: usize,
}

impl ReplayBuffer {
    pub fn new(
        capacity: usize,
        state_size: usize,
        action_size: usize,
        reward_size: usize,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(HustingsError::invalid_parameter(
                "capacity",
                "must be positive",
            ));
        }
        let slots = (0..capacity)
            .map(|_| Transition {
                state: Array1::zeros(state_size),
                action: Array1::zeros(action_size),
                reward: Array1::zeros(reward_size),
                next_state: Array1::zeros(state_size),
            })
            .collect();
        Ok(ReplayBuffer {
            slots,
            cursor: 0,
            state_size,
            action_size,
            reward_size,
        })
    }

    /// Store a complete 4-tuple at the write cursor and advance it circularly.
    ///
    /// Fails with `DimensionMismatch` (leaving the buffer untouched) if any
    /// vector does not match the widths fixed at construction.
    pub fn add(
        &mut self,
        state: Array1<f32>,
        action: Array1<f32>,
        reward: Array1<f32>,
        next_state: Array1<f32>,
    ) -> Result<()> {
        if state.len() != self.state_size || next_state.len() != self.state_size {
            return Err(HustingsError::dimension_mismatch(
                format!("state of length {}", self.state_size),
                format!("lengths {} and {}", state.len(), next_state.len()),
            ));
        }
        if action.len() != self.action_size {
            return Err(HustingsError::dimension_mismatch(
                format!("action of length {}", self.action_size),
                format!("length {}", action.len()),
            ));
        }
        if reward.len() != self.reward_size {
            return Err(HustingsError::dimension_mismatch(
                format!("reward of length {}", self.reward_size),
                format!("length {}", reward.len()),
            ));
        }

        self.slots[self.cursor] = Transition {
            state,
            action,
            reward,
            next_state,
        };
        self.cursor = (self.cursor + 1) % self.slots.len();
        Ok(())
    }

    /// The transition stored at a raw slot index.
    pub fn get(&self, index: usize) -> Result<&Transition> {
        self.slots.get(index).ok_or_else(|| {
            HustingsError::invalid_parameter(
                "index".to_string(),
                format!("{} is out of range for capacity {}", index, self.slots.len()),
            )
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot that the next `add` will overwrite.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
