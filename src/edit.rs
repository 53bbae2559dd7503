//! Edits that can be recorded in a causal log.
//!
//! The log manager only needs one thing from an edit: that it can be applied
//! to a document deterministically. Replaying the same log always reapplies
//! the same edits in the same order, so individual edits do not have to be
//! idempotent.
//!
//! Edits address nodes by `NodeId`, never by a reference to live state, so a
//! replay after a late insertion re-resolves every target against the
//! rebuilt document.

use crate::document::Document;
use crate::document::NodeId;

/// Something that deterministically mutates a document.
pub trait Apply {
    /// The document this edit acts on. `Default` is the empty document that
    /// a rebuild starts from.
    type Document: Clone + Default;

    /// Apply this edit to the document.
    fn apply(&self, doc: &mut Self::Document);
}

/// An edit to a `Document`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edit {
    /// Append a new node with empty text.
    Create { author: String },

    /// Replace the text of a node.
    Update { node: NodeId, text: String },

    /// Move a node to a new position in the list.
    Move { node: NodeId, to: usize },

    /// Remove a node.
    Remove { node: NodeId },
}

impl Edit {
    pub fn create(author: impl Into<String>) -> Edit {
        return Edit::Create {
            author: author.into(),
        };
    }

    pub fn update(node: NodeId, text: impl Into<String>) -> Edit {
        return Edit::Update {
            node,
            text: text.into(),
        };
    }

    pub fn move_to(node: NodeId, to: usize) -> Edit {
        return Edit::Move { node, to };
    }

    pub fn remove(node: NodeId) -> Edit {
        return Edit::Remove { node };
    }

    /// The node this edit targets. None for `Create`, whose id is only known
    /// once it has been applied.
    pub fn target(&self) -> Option<NodeId> {
        return match self {
            Edit::Create { .. } => None,
            Edit::Update { node, .. } => Some(*node),
            Edit::Move { node, .. } => Some(*node),
            Edit::Remove { node } => Some(*node),
        };
    }
}

impl Apply for Edit {
    type Document = Document;

    fn apply(&self, doc: &mut Document) {
        let applied = match self {
            Edit::Create { author } => {
                doc.create(author);
                true
            }
            Edit::Update { node, text } => doc.update(*node, text),
            Edit::Move { node, to } => doc.move_to(*node, *to),
            Edit::Remove { node } => doc.remove(*node),
        };
        if !applied {
            log::trace!("edit {:?} targets a missing node, skipped", self);
        }
    }
}
