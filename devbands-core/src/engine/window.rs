//! Bounded lookback buffer of per-bar contributions.

use std::collections::VecDeque;

use super::state::Contribution;

/// Fixed-capacity FIFO of the contributions currently inside the window.
///
/// Holds at most `capacity` entries; pushing onto a full window hands back
/// the oldest entry so the caller can subtract it from the running sums.
/// Storage is allocated once with one spare slot for the incoming bar.
#[derive(Debug, Clone)]
pub struct ContributionWindow {
    slots: VecDeque<Contribution>,
    capacity: usize,
    weighted: usize,
}

impl ContributionWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            slots: VecDeque::with_capacity(capacity + 1),
            capacity,
            weighted: 0,
        }
    }

    /// Append `c`, returning the evicted oldest entry if the window was full.
    pub fn push(&mut self, c: Contribution) -> Option<Contribution> {
        let evicted = if self.slots.len() == self.capacity {
            self.slots.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            if !old.is_weightless() {
                self.weighted -= 1;
            }
        }
        if !c.is_weightless() {
            self.weighted += 1;
        }
        self.slots.push_back(c);
        evicted
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Number of entries in the window that carry non-zero volume.
    pub fn weighted_len(&self) -> usize {
        self.weighted
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contribution> {
        self.slots.iter()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.weighted = 0;
    }
}
