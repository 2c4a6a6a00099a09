//! Slot accounting: admits candidate files against remaining capacity.

/// Computes remaining capacity from the live committed and in-flight counts.
///
/// Capacity is shared: committed assets and in-flight sessions both occupy a
/// slot, so `committed + in_flight <= max_total` holds at all times.
#[derive(Debug, Clone, Copy)]
pub struct SlotAllocator {
    max_total: usize,
}

impl SlotAllocator {
    pub fn new(max_total: usize) -> Self {
        Self { max_total }
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }

    pub fn available(&self, committed: usize, in_flight: usize) -> usize {
        self.max_total
            .saturating_sub(committed.saturating_add(in_flight))
    }

    /// Split candidates into admitted and overflow, preserving input order
    /// (selection/drop order). Overflow entries never get a session.
    pub fn admit<T>(&self, candidates: Vec<T>, committed: usize, in_flight: usize) -> (Vec<T>, Vec<T>) {
        let available = self.available(committed, in_flight);
        let cut = available.min(candidates.len());
        let mut admitted = candidates;
        let overflow = admitted.split_off(cut);
        (admitted, overflow)
    }
}
