//! Cursor arithmetic for fixed-capacity trace neighborhoods
//!
//! Tracks which slot holds the newest record, which slot holds the center
//! record and how many slots are valid. Every buffer in this crate keeps its
//! data in whatever physical layout suits it and asks a `RingIndex` where the
//! logical records are.

/// Write/center cursors and valid count over `capacity` slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingIndex {
    capacity: usize,

    /// Slot of the most recently pushed record
    newest: usize,

    /// Slot of the center record
    center: usize,

    /// Valid slots, in [0, capacity]
    count: usize,
}

impl RingIndex {
    /// Create an empty ring over `capacity` slots
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be positive");
        Self {
            capacity,
            newest: capacity - 1,
            center: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    /// More than half the slots hold records, so the center has a full
    /// trailing half-neighborhood.
    pub fn is_ready(&self) -> bool {
        self.count > self.capacity / 2
    }

    /// Slot of the newest record
    pub fn newest(&self) -> usize {
        self.newest
    }

    /// Slot of the center record
    pub fn center(&self) -> usize {
        self.center
    }

    /// Slot of the oldest valid record
    pub fn oldest(&self) -> usize {
        (self.newest + 1 + self.capacity - self.count) % self.capacity
    }

    /// Position of the center record counted from the oldest valid record
    pub fn center_offset(&self) -> usize {
        (self.center + self.capacity - self.oldest()) % self.capacity
    }

    /// Slot holding the record `offset` positions after the oldest
    pub fn physical(&self, offset: usize) -> usize {
        debug_assert!(offset < self.count, "offset {} beyond {} valid slots", offset, self.count);
        (self.oldest() + offset) % self.capacity
    }

    /// Account for a pushed record and return the slot it must be written to.
    ///
    /// Once the ring is more than half full the center follows the newest
    /// record at a constant lag of `capacity / 2`; when full the oldest
    /// record is overwritten.
    pub fn advance(&mut self) -> usize {
        self.newest = (self.newest + 1) % self.capacity;
        if self.count > self.capacity / 2 {
            self.center = (self.center + 1) % self.capacity;
        }
        self.count = (self.count + 1).min(self.capacity);
        self.check();
        self.newest
    }

    /// Account for an end-of-stream push: drop the oldest record and move the
    /// center one record forward, never past the newest. No effect once empty.
    pub fn retreat(&mut self) {
        if self.count == 0 {
            return;
        }
        self.count -= 1;
        if self.center != self.newest {
            self.center = (self.center + 1) % self.capacity;
        }
        self.check();
    }

    #[inline]
    fn check(&self) {
        debug_assert!(
            self.count == 0 || self.center_offset() < self.count,
            "center slot {} outside valid range (oldest {}, count {})",
            self.center,
            self.oldest(),
            self.count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_steady_state() {
        let mut ring = RingIndex::new(5);
        assert!(ring.is_empty());

        let slots: Vec<usize> = (0..7).map(|_| ring.advance()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4, 0, 1]);
        assert!(ring.is_full());
        assert_eq!(ring.count(), 5);

        // Center trails the newest record by capacity/2
        assert_eq!(ring.center(), 4);
        assert_eq!(ring.oldest(), 2);
        assert_eq!(ring.center_offset(), 2);
    }

    #[test]
    fn test_ready_transitions() {
        let mut ring = RingIndex::new(5);
        let ready: Vec<bool> = (0..5)
            .map(|_| {
                ring.advance();
                ring.is_ready()
            })
            .collect();
        assert_eq!(ready, vec![false, false, true, true, true]);

        // Center stays on the first record while filling
        let mut ring = RingIndex::new(5);
        for expected_center in [0, 0, 0, 1, 2] {
            ring.advance();
            assert_eq!(ring.center(), expected_center);
        }
    }

    #[test]
    fn test_drain() {
        let mut ring = RingIndex::new(5);
        for _ in 0..6 {
            ring.advance();
        }
        assert_eq!(ring.center(), 3);

        ring.retreat();
        assert_eq!(ring.count(), 4);
        assert_eq!(ring.center(), 4);
        assert_eq!(ring.center_offset(), 2);
        assert!(ring.is_ready());

        ring.retreat();
        assert_eq!(ring.count(), 3);
        assert_eq!(ring.center(), ring.newest());
        assert!(ring.is_ready());

        ring.retreat();
        assert_eq!(ring.count(), 2);
        assert_eq!(ring.center(), ring.newest());
        assert!(!ring.is_ready());

        ring.retreat();
        ring.retreat();
        assert!(ring.is_empty());
        ring.retreat();
        assert!(ring.is_empty());
    }

    #[test]
    fn test_physical_mapping() {
        let mut ring = RingIndex::new(3);
        for _ in 0..4 {
            ring.advance();
        }
        // Slots hold records 3, 1, 2 -> oldest is slot 1
        assert_eq!(ring.oldest(), 1);
        assert_eq!(ring.physical(0), 1);
        assert_eq!(ring.physical(1), 2);
        assert_eq!(ring.physical(2), 0);
    }

    #[test]
    fn test_capacity_one() {
        let mut ring = RingIndex::new(1);
        assert_eq!(ring.advance(), 0);
        assert!(ring.is_ready());
        assert_eq!(ring.center_offset(), 0);
        assert_eq!(ring.advance(), 0);
        assert_eq!(ring.center(), 0);
        ring.retreat();
        assert!(!ring.is_ready());
    }
}
