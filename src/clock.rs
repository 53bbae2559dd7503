//! Causal timestamps for ordering edits across participants.
//!
//! A timestamp is a vector clock with one counter per participant. The slot
//! index is the participant's identity, and a participant only ever bumps
//! its own slot. Timestamps are values: `increment` and `merge` return new
//! timestamps and leave the receiver untouched, so old timestamps stay valid
//! for comparing against history.
//!
//! # Ordering
//!
//! Vector clocks only give a partial order. `[1, 0]` and `[0, 1]` are
//! concurrent and neither happened before the other. The log needs a single
//! order that every participant computes identically, so `Ord` compares the
//! counters lexicographically: the first differing slot decides, and the
//! lower slot index wins ties. This agrees with causal order whenever causal
//! order is decisive (if `a` happened before `b`, then `a < b`) and falls
//! back to participant priority otherwise, so `[1, 0] > [0, 1]`.
//!
//! Complexity:
//! - increment: O(n) where n is the number of participants
//! - merge: O(n)
//! - compare: O(n)

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::Error;
use crate::error::Result;

/// Inline capacity of the counter vector. Systems with more participants
/// spill onto the heap.
const INLINE_SLOTS: usize = 4;

/// An immutable vector of per-participant event counters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp {
    counters: SmallVec<[u64; INLINE_SLOTS]>,
}

impl Timestamp {
    /// Create a timestamp for `participants` participants with every slot zero.
    pub fn new(participants: usize) -> Timestamp {
        return Timestamp {
            counters: SmallVec::from_elem(0, participants),
        };
    }

    /// Create a timestamp from explicit counter values.
    pub fn from_counters(counters: &[u64]) -> Timestamp {
        return Timestamp {
            counters: SmallVec::from_slice(counters),
        };
    }

    /// Number of participant slots.
    #[inline]
    pub fn len(&self) -> usize {
        return self.counters.len();
    }

    /// True for a timestamp with no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.counters.is_empty();
    }

    /// The counter for a single participant, or None if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u64> {
        return self.counters.get(index).copied();
    }

    /// All counters in slot order.
    #[inline]
    pub fn counters(&self) -> &[u64] {
        return &self.counters;
    }

    /// Return a copy with slot `owned` one greater.
    ///
    /// Panics if `owned` is not a valid slot.
    pub fn increment(&self, owned: usize) -> Timestamp {
        assert!(
            owned < self.counters.len(),
            "owned index {} out of range for {} slots",
            owned,
            self.counters.len()
        );
        let mut next = self.clone();
        next.counters[owned] += 1;
        return next;
    }

    /// Element-wise maximum of two timestamps.
    ///
    /// Panics if the lengths differ. See `try_merge` for the checked form.
    pub fn merge(&self, other: &Timestamp) -> Timestamp {
        assert_eq!(
            self.counters.len(),
            other.counters.len(),
            "cannot merge timestamps of different lengths"
        );
        return self.zip_max(other);
    }

    /// Element-wise maximum, or `LengthMismatch` if the lengths differ.
    pub fn try_merge(&self, other: &Timestamp) -> Result<Timestamp> {
        self.check_len(other)?;
        return Ok(self.zip_max(other));
    }

    /// Check that `other` has as many slots as this timestamp.
    pub fn check_len(&self, other: &Timestamp) -> Result<()> {
        if self.counters.len() != other.counters.len() {
            return Err(Error::LengthMismatch {
                expected: self.counters.len(),
                actual: other.counters.len(),
            });
        }
        return Ok(());
    }

    fn zip_max(&self, other: &Timestamp) -> Timestamp {
        let counters = self
            .counters
            .iter()
            .zip(other.counters.iter())
            .map(|(a, b)| *a.max(b))
            .collect();
        return Timestamp { counters };
    }

    /// True if every slot of self is >= the same slot of other.
    pub fn dominates(&self, other: &Timestamp) -> bool {
        assert_eq!(self.counters.len(), other.counters.len());
        return self
            .counters
            .iter()
            .zip(other.counters.iter())
            .all(|(a, b)| a >= b);
    }

    /// True if self causally precedes other: dominated by it and not equal.
    pub fn happens_before(&self, other: &Timestamp) -> bool {
        return other.dominates(self) && self != other;
    }

    /// True if neither timestamp happened before the other.
    pub fn concurrent_with(&self, other: &Timestamp) -> bool {
        return !self.dominates(other) && !other.dominates(self);
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl Ord for Timestamp {
    /// Lexicographic over slots; the lowest differing slot decides.
    ///
    /// Panics if the lengths differ.
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.counters.len(),
            other.counters.len(),
            "cannot compare timestamps of different lengths"
        );
        for (a, b) in self.counters.iter().zip(other.counters.iter()) {
            if a != b {
                return a.cmp(b);
            }
        }
        return Ordering::Equal;
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, counter) in self.counters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", counter)?;
        }
        return write!(f, "]");
    }
}
