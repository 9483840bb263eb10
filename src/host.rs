//! The tree operations the rewrite engine relies on
//!
//! The engine never touches the document directly. It asks a [`NodeHost`]
//! to split, replace and insert, which keeps the surgery independent of how
//! the tree is stored. Within this crate the host is
//! [`Transaction`](crate::model::Transaction).

use crate::error::EngineError;
use crate::model::{Node, NodeKey};

/// A plain text unit that just settled, with its text at that moment
///
/// The text is a snapshot: by the time a transform runs, an earlier
/// transform in the same pass may already have changed the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledUnit {
    pub key: NodeKey,
    pub text: String,
}

/// Tree primitives consumed by the rewrite engine
///
/// Offsets are character offsets into a unit's text.
pub trait NodeHost {
    /// Look up a node by key
    fn node(&self, key: NodeKey) -> Option<&Node>;

    /// Split a plain text unit at the given offsets
    ///
    /// Offsets at 0, at or past the end, and repeats are ignored. The first
    /// piece keeps the original key and every piece keeps the original
    /// attributes. Returns the pieces' keys in order.
    fn split_text(&mut self, key: NodeKey, offsets: &[usize]) -> Result<Vec<NodeKey>, EngineError>;

    /// Replace any node with a new plain text unit holding `text`
    fn replace_with_text(&mut self, key: NodeKey, text: &str) -> Result<NodeKey, EngineError>;

    /// Overwrite the text of a plain text unit
    fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), EngineError>;

    /// Move the edit cursor to the start of a node
    fn select_start_of(&mut self, key: NodeKey) -> Result<(), EngineError>;

    /// Insert nodes at the edit cursor, leaving the cursor after the last one
    fn insert_at_cursor(&mut self, nodes: Vec<Node>) -> Result<Vec<NodeKey>, EngineError>;

    /// Build a detached token with a fresh key
    fn create_token(&mut self, text: &str) -> Node;

    /// Build a detached plain text unit with a fresh key
    fn create_text(&mut self, text: &str) -> Node;
}
