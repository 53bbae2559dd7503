//! Woweb - replicated documents that converge without a coordinator.
//!
//! Every participant keeps its own log of edits ordered by vector-clock
//! timestamps. The order is total and computed from the timestamps alone,
//! so any two participants that have seen the same edits hold the same log
//! and the same document, whatever order the edits arrived in.
//!
//! # Quick Start
//!
//! ```
//! use woweb::edit::Edit;
//! use woweb::oplog::LogManager;
//!
//! // Two participants, each owning one timestamp slot
//! let mut local: LogManager = LogManager::with_participants(2, 0).unwrap();
//! let mut remote: LogManager = LogManager::with_participants(2, 1).unwrap();
//!
//! // Concurrent edits, exchanged along with their timestamps
//! let a = local.apply_local(Edit::create("local"));
//! let b = remote.apply_local(Edit::create("remote"));
//! local.apply_external(Edit::create("remote"), b).unwrap();
//! remote.apply_external(Edit::create("local"), a).unwrap();
//!
//! assert_eq!(local.document(), remote.document());
//! ```

pub mod clock;
pub mod document;
pub mod edit;
pub mod error;
pub mod oplog;
pub mod roster;
pub mod sim;

pub use clock::Timestamp;
pub use document::Document;
pub use edit::Apply;
pub use edit::Edit;
pub use error::Error;
pub use error::Result;
pub use oplog::LogManager;
pub use oplog::ManagerConfig;
