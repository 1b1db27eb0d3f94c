//! Ping-pong tile state buffers.

use runoff_data::{PhosphorusCount, TileState};

/// Adds `amount` to `states[index]`, saturating. Returns the amount that landed.
///
/// `index` must be in range.
#[inline]
pub fn add_phosphorus(states: &mut [TileState], index: usize, amount: PhosphorusCount) -> PhosphorusCount {
    states[index].add(amount)
}

/// Two equally sized state buffers and which one is current.
///
/// Only the active buffer is visible to readers. A tick reads the active
/// buffer, writes the other, then [`swap`](Self::swap) flips the roles
/// without copying.
#[derive(Debug, Clone)]
pub struct StateBuffers {
    buffers: [Vec<TileState>; 2],
    active: usize,
}

impl StateBuffers {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            buffers: [vec![TileState::default(); size], vec![TileState::default(); size]],
            active: 0,
        }
    }

    /// Starts with `states` as the active buffer.
    #[must_use]
    pub fn from_states(states: Vec<TileState>) -> Self {
        let inactive = vec![TileState::default(); states.len()];
        Self {
            buffers: [states, inactive],
            active: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers[0].is_empty()
    }

    #[inline]
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn active(&self) -> &[TileState] {
        &self.buffers[self.active]
    }

    #[inline]
    pub fn active_mut(&mut self) -> &mut [TileState] {
        &mut self.buffers[self.active]
    }

    /// `(active, inactive)` for one tick.
    #[inline]
    pub fn read_write(&mut self) -> (&[TileState], &mut [TileState]) {
        let [first, second] = &mut self.buffers;
        if self.active == 0 {
            (&first[..], &mut second[..])
        } else {
            (&second[..], &mut first[..])
        }
    }

    #[inline]
    pub fn swap(&mut self) {
        self.active ^= 1;
    }

    /// Saturating add into the active buffer.
    #[inline]
    pub fn add_phosphorus(&mut self, index: usize, amount: PhosphorusCount) -> PhosphorusCount {
        add_phosphorus(self.active_mut(), index, amount)
    }

    /// Sum of the active buffer.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.active().iter().map(|s| s.count as u64).sum()
    }
}
