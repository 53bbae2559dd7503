//! The replicated document: an ordered list of authored text nodes.
//!
//! The document is never edited directly. It is the fold of a log of edits
//! over an empty document, see `crate::oplog`.

use std::fmt;

/// Stable identifier of a node. Ids are handed out in creation order and are
/// never reused, even after the node is removed.
pub type NodeId = u64;

/// A single node in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub id: NodeId,
    pub author: String,
    pub text: String,
}

/// An ordered list of nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Document {
    nodes: Vec<Node>,
    /// Id for the next created node.
    next_id: NodeId,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Document {
        return Document::default();
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        return &self.nodes;
    }

    pub fn len(&self) -> usize {
        return self.nodes.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.nodes.is_empty();
    }

    /// Position of a node in the list, if it exists.
    pub fn find(&self, id: NodeId) -> Option<usize> {
        return self.nodes.iter().position(|node| node.id == id);
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        return self.nodes.iter().find(|node| node.id == id);
    }

    /// Append a fresh node with empty text and return its id.
    pub fn create(&mut self, author: &str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            author: author.to_string(),
            text: String::new(),
        });
        return id;
    }

    /// Replace a node's text. Returns false if the node does not exist.
    pub fn update(&mut self, id: NodeId, text: &str) -> bool {
        let Some(i) = self.find(id) else {
            return false;
        };
        self.nodes[i].text = text.to_string();
        return true;
    }

    /// Move a node to position `to`, clamped to the end of the list.
    /// Returns false if the node does not exist.
    pub fn move_to(&mut self, id: NodeId, to: usize) -> bool {
        let Some(i) = self.find(id) else {
            return false;
        };
        let node = self.nodes.remove(i);
        let to = to.min(self.nodes.len());
        self.nodes.insert(to, node);
        return true;
    }

    /// Remove a node. Returns false if the node does not exist.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(i) = self.find(id) else {
            return false;
        };
        self.nodes.remove(i);
        return true;
    }

    /// A blake3 hash over every node, in order.
    ///
    /// Two participants that agree on the digest agree on node order, ids,
    /// authors and text.
    pub fn digest(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for node in &self.nodes {
            hasher.update(&node.id.to_le_bytes());
            hasher.update(&(node.author.len() as u64).to_le_bytes());
            hasher.update(node.author.as_bytes());
            hasher.update(&(node.text.len() as u64).to_le_bytes());
            hasher.update(node.text.as_bytes());
        }
        return hasher.finalize();
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "[{}] {}: {}", self.id, self.author, self.text);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", node)?;
        }
        return Ok(());
    }
}
