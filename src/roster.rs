//! Roster mapping participant names to owned timestamp slots.
//!
//! Timestamps identify participants by slot index only. The roster hands out
//! slots to named participants in first-seen order and never grows past the
//! participant count the system was configured with, since every timestamp
//! in the system has exactly that many slots.
//!
//! - Assign or look up by name: O(1) average case (hash map)
//! - Name for a slot: O(1) (array lookup)

use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::error::Result;

/// Names of the participants, indexed by owned slot.
#[derive(Clone, Debug)]
pub struct Roster {
    capacity: usize,
    name_to_slot: FxHashMap<String, usize>,
    slot_to_name: Vec<String>,
}

impl Roster {
    /// Create an empty roster for `capacity` participants.
    pub fn new(capacity: usize) -> Roster {
        return Roster {
            capacity,
            name_to_slot: FxHashMap::default(),
            slot_to_name: Vec::with_capacity(capacity),
        };
    }

    /// Create a roster with the given names in slot order.
    ///
    /// Duplicate names share the first slot they were given.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Roster {
        let mut roster = Roster::new(names.len());
        for name in names {
            // Cannot overflow: capacity is the name count.
            let _ = roster.join(name.as_ref());
        }
        return roster;
    }

    /// Return the slot for `name`, assigning the next free one if needed.
    pub fn join(&mut self, name: &str) -> Result<usize> {
        if let Some(&slot) = self.name_to_slot.get(name) {
            return Ok(slot);
        }

        let slot = self.slot_to_name.len();
        if slot >= self.capacity {
            return Err(Error::ParticipantOutOfRange {
                index: slot,
                participants: self.capacity,
            });
        }

        self.slot_to_name.push(name.to_string());
        self.name_to_slot.insert(name.to_string(), slot);
        return Ok(slot);
    }

    /// The slot owned by `name`, if it has joined.
    #[inline]
    pub fn slot(&self, name: &str) -> Option<usize> {
        return self.name_to_slot.get(name).copied();
    }

    /// The participant that owns `slot`.
    #[inline]
    pub fn name(&self, slot: usize) -> Option<&str> {
        return self.slot_to_name.get(slot).map(|s| s.as_str());
    }

    /// Number of participants the roster can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        return self.capacity;
    }

    /// Number of participants that have joined.
    #[inline]
    pub fn len(&self) -> usize {
        return self.slot_to_name.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.slot_to_name.is_empty();
    }

    /// Iterate over all (slot, name) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        return self
            .slot_to_name
            .iter()
            .enumerate()
            .map(|(slot, name)| (slot, name.as_str()));
    }
}
