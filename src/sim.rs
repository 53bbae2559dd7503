//! In-process simulation of several participants editing one document.
//!
//! A `Cluster` runs one `LogManager` per named participant. A local edit is
//! applied at its author and queued in every other participant's inbox
//! together with its timestamp. Nothing is delivered until asked, so tests
//! and the demo binary can pick any arrival order, including holding a
//! message back until after later edits have been made.

use crate::clock::Timestamp;
use crate::document::Document;
use crate::edit::Edit;
use crate::error::Error;
use crate::error::Result;
use crate::oplog::LogManager;
use crate::roster::Roster;

/// An edit in flight to one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Slot of the participant that made the edit.
    pub sender: usize,
    pub timestamp: Timestamp,
    pub edit: Edit,
}

/// A set of participants with undelivered messages between them.
pub struct Cluster {
    roster: Roster,
    managers: Vec<LogManager>,
    inboxes: Vec<Vec<Message>>,
}

impl Cluster {
    /// Create a cluster with one participant per distinct name, owning slots
    /// in the order given.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Cluster> {
        let roster = Roster::from_names(names);
        let participants = roster.len();
        if participants == 0 {
            return Err(Error::NoParticipants);
        }

        let mut managers = Vec::with_capacity(participants);
        for owned in 0..participants {
            managers.push(LogManager::with_participants(participants, owned)?);
        }

        return Ok(Cluster {
            roster,
            managers,
            inboxes: vec![Vec::new(); participants],
        });
    }

    pub fn roster(&self) -> &Roster {
        return &self.roster;
    }

    fn slot(&self, name: &str) -> Result<usize> {
        return self
            .roster
            .slot(name)
            .ok_or_else(|| Error::UnknownParticipant(name.to_string()));
    }

    /// Apply an edit at `name` and queue it for everyone else.
    pub fn local(&mut self, name: &str, edit: Edit) -> Result<Timestamp> {
        let sender = self.slot(name)?;
        let timestamp = self.managers[sender].apply_local(edit.clone());

        for (slot, inbox) in self.inboxes.iter_mut().enumerate() {
            if slot != sender {
                inbox.push(Message {
                    sender,
                    timestamp: timestamp.clone(),
                    edit: edit.clone(),
                });
            }
        }

        return Ok(timestamp);
    }

    /// Messages waiting for `name`, oldest first.
    pub fn pending(&self, name: &str) -> Result<&[Message]> {
        let slot = self.slot(name)?;
        return Ok(&self.inboxes[slot]);
    }

    /// Deliver the `index`th pending message of `name`. Returns false if
    /// there is no such message.
    pub fn deliver(&mut self, name: &str, index: usize) -> Result<bool> {
        let slot = self.slot(name)?;
        if index >= self.inboxes[slot].len() {
            return Ok(false);
        }
        let message = self.inboxes[slot].remove(index);
        log::trace!(
            "deliver {} from {} to {}",
            message.timestamp,
            message.sender,
            slot
        );
        self.managers[slot].apply_external(message.edit, message.timestamp)?;
        return Ok(true);
    }

    /// Deliver the oldest pending message of `name`.
    pub fn deliver_next(&mut self, name: &str) -> Result<bool> {
        return self.deliver(name, 0);
    }

    /// Deliver every pending message of `name` in queue order. Returns how
    /// many were delivered.
    pub fn deliver_all(&mut self, name: &str) -> Result<usize> {
        let mut delivered = 0;
        while self.deliver_next(name)? {
            delivered += 1;
        }
        return Ok(delivered);
    }

    /// Deliver everything to everyone.
    pub fn flush(&mut self) -> Result<usize> {
        let names: Vec<String> = self.roster.iter().map(|(_, name)| name.to_string()).collect();
        let mut delivered = 0;
        for name in &names {
            delivered += self.deliver_all(name)?;
        }
        return Ok(delivered);
    }

    pub fn manager(&self, name: &str) -> Result<&LogManager> {
        let slot = self.slot(name)?;
        return Ok(&self.managers[slot]);
    }

    /// A copy of the document as `name` currently sees it.
    pub fn document(&self, name: &str) -> Result<Document> {
        return Ok(self.manager(name)?.document());
    }

    /// True if every participant holds the same document.
    pub fn converged(&self) -> bool {
        let mut digests = self.managers.iter().map(|m| m.document().digest());
        let Some(first) = digests.next() else {
            return true;
        };
        return digests.all(|digest| digest == first);
    }
}
