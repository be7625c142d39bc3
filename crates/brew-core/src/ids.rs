//! # Sequence Counters
//!
//! Monotonic integer ids, one counter per record type.
//!
//! Each repository owns its own `IdSequence`; there is no process-wide
//! generator. Loading or inserting a record with an explicit id calls
//! [`IdSequence::observe`] so later allocations never collide with it.
//!
//! ```rust
//! use brew_core::IdSequence;
//!
//! let mut seq = IdSequence::new();
//! seq.observe(41);          // loaded from disk
//! assert_eq!(seq.next(), 42);
//! seq.observe(7);           // lower ids never move the counter back
//! assert_eq!(seq.next(), 43);
//! ```

use serde::{Deserialize, Serialize};

/// Counter handing out ids `1, 2, 3, ...` for one record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    last: u32,
}

impl IdSequence {
    /// A counter whose first id is 1.
    pub const fn new() -> Self {
        IdSequence { last: 0 }
    }

    /// Allocates the next id.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        self.last += 1;
        self.last
    }

    /// Raises the counter so it is at least `id`.
    pub fn observe(&mut self, id: u32) {
        self.last = self.last.max(id);
    }

    /// Highest id handed out or observed.
    pub fn current(&self) -> u32 {
        self.last
    }

    /// Starts over at 1, used before reloading a file.
    pub fn reset(&mut self) {
        self.last = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_monotonic() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn test_observe_only_raises() {
        let mut seq = IdSequence::new();
        seq.observe(10);
        seq.observe(3);
        assert_eq!(seq.current(), 10);
        assert_eq!(seq.next(), 11);
    }

    #[test]
    fn test_reset() {
        let mut seq = IdSequence::new();
        seq.observe(5);
        seq.reset();
        assert_eq!(seq.next(), 1);
    }
}
