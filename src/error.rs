//! Errors surfaced at the manager boundary.
//!
//! Everything here points at a misconfigured participant set. None of it is
//! retried or recovered inside the crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("a system needs at least one participant")]
    NoParticipants,

    #[error("participant index {index} is out of range for {participants} participants")]
    ParticipantOutOfRange { index: usize, participants: usize },

    #[error("timestamp has {actual} slots, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unknown participant {0:?}")]
    UnknownParticipant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
