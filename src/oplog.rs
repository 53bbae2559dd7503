//! A causally ordered edit log with a derived document.
//!
//! Each participant owns one `LogManager`. Every accepted edit is stored
//! together with its timestamp, and the log is kept sorted by the total
//! order on timestamps (see `crate::clock`). The document is the fold of
//! the log, in order, over an empty document. Participants that have
//! received the same set of edits hold the same log and therefore the same
//! document, no matter in which order the edits arrived.
//!
//! # Insertion
//!
//! A new entry is placed after the last entry whose timestamp is <= its own,
//! scanning backward from the tail. Most edits arrive in order and land at
//! the tail, where they are applied to the live document directly. A late
//! arrival that sorts before existing entries is spliced in and the document
//! is rebuilt from scratch, since an earlier edit can change what the later
//! ones act on (a create shifts the position a later move depends on).
//!
//! Complexity:
//! - tail append: O(1) amortized plus the edit itself
//! - splice: O(n) to find the position plus a full O(n) replay
//!
//! A steady stream of late arrivals therefore costs O(n^2) over a session.
//!
//! # Invariants
//!
//! - The log is sorted by timestamp, ties kept in arrival order.
//! - After every operation the live document equals `replay()`.
//!
//! A manager is single-threaded. Callers that feed it from several threads
//! must serialize access themselves.

use crate::clock::Timestamp;
use crate::edit::Apply;
use crate::edit::Edit;
use crate::error::Error;
use crate::error::Result;

/// Participant count and the slot this participant owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Number of participants, which fixes the timestamp length.
    pub participants: usize,
    /// The slot this participant increments.
    pub owned: usize,
}

impl ManagerConfig {
    pub fn new(participants: usize, owned: usize) -> ManagerConfig {
        return ManagerConfig { participants, owned };
    }

    /// Check that the owned slot exists.
    pub fn validate(&self) -> Result<()> {
        if self.participants == 0 {
            return Err(Error::NoParticipants);
        }
        if self.owned >= self.participants {
            return Err(Error::ParticipantOutOfRange {
                index: self.owned,
                participants: self.participants,
            });
        }
        return Ok(());
    }
}

/// An accepted edit and the timestamp it was accepted under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<E> {
    pub timestamp: Timestamp,
    pub edit: E,
}

/// How insertions have been handled so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Entries appended at the tail and applied incrementally.
    pub appended: u64,
    /// Entries spliced before the tail, each followed by a full rebuild.
    pub spliced: u64,
}

/// One participant's log and document.
pub struct LogManager<E: Apply = Edit> {
    config: ManagerConfig,
    clock: Timestamp,
    entries: Vec<Entry<E>>,
    document: E::Document,
    stats: Stats,
}

impl<E: Apply> LogManager<E> {
    /// Create an empty manager.
    pub fn new(config: ManagerConfig) -> Result<LogManager<E>> {
        config.validate()?;
        return Ok(LogManager {
            config,
            clock: Timestamp::new(config.participants),
            entries: Vec::new(),
            document: E::Document::default(),
            stats: Stats::default(),
        });
    }

    /// Shorthand for `new(ManagerConfig::new(participants, owned))`.
    pub fn with_participants(participants: usize, owned: usize) -> Result<LogManager<E>> {
        return LogManager::new(ManagerConfig::new(participants, owned));
    }

    pub fn config(&self) -> ManagerConfig {
        return self.config;
    }

    /// The slot this participant owns.
    pub fn owned(&self) -> usize {
        return self.config.owned;
    }

    pub fn participants(&self) -> usize {
        return self.config.participants;
    }

    /// The local clock.
    pub fn timestamp(&self) -> &Timestamp {
        return &self.clock;
    }

    /// Number of log entries.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// Log entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<E>> {
        return self.entries.iter();
    }

    pub fn stats(&self) -> Stats {
        return self.stats;
    }

    /// A copy of the current document.
    pub fn document(&self) -> E::Document {
        return self.document.clone();
    }

    /// Fold the whole log over an empty document, leaving the live document
    /// alone. Always equal to `document()`.
    pub fn replay(&self) -> E::Document {
        let mut document = E::Document::default();
        for entry in &self.entries {
            entry.edit.apply(&mut document);
        }
        return document;
    }

    /// True if every entry's timestamp is <= the next one's.
    pub fn is_sorted(&self) -> bool {
        return self
            .entries
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp);
    }

    /// Apply an edit originated by this participant.
    ///
    /// Returns the edit's timestamp, which must travel with the edit to every
    /// other participant.
    pub fn apply_local(&mut self, edit: E) -> Timestamp {
        self.clock = self.clock.increment(self.config.owned);
        let timestamp = self.clock.clone();
        self.insert(timestamp.clone(), edit);
        return timestamp;
    }

    /// Apply an edit received from another participant under `timestamp`.
    ///
    /// The local clock is bumped before being merged with the edit's
    /// timestamp, so this participant's own progress is never lost. A
    /// timestamp of the wrong length is rejected before anything changes.
    pub fn apply_external(&mut self, edit: E, timestamp: Timestamp) -> Result<()> {
        self.clock.check_len(&timestamp)?;
        let bumped = self.clock.increment(self.config.owned);
        self.insert(timestamp.clone(), edit);
        self.clock = bumped.merge(&timestamp);
        return Ok(());
    }

    /// Position after the last entry that sorts <= `timestamp`.
    fn insertion_index(&self, timestamp: &Timestamp) -> usize {
        let mut i = self.entries.len();
        while i > 0 && *timestamp < self.entries[i - 1].timestamp {
            i -= 1;
        }
        return i;
    }

    fn insert(&mut self, timestamp: Timestamp, edit: E) {
        let i = self.insertion_index(&timestamp);

        if i == self.entries.len() {
            log::trace!("append {} at {}", timestamp, i);
            edit.apply(&mut self.document);
            self.entries.push(Entry { timestamp, edit });
            self.stats.appended += 1;
        } else {
            log::debug!(
                "splice {} at {} of {}, rebuilding document",
                timestamp,
                i,
                self.entries.len()
            );
            self.entries.insert(i, Entry { timestamp, edit });
            self.document = self.replay();
            self.stats.spliced += 1;
        }

        debug_assert!(self.is_sorted());
    }
}
