//! Document model - the complete state of the editor
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod document;
pub mod editor;
pub mod node;
pub mod transaction;

pub use document::{DocumentTree, InsertPoint, Paragraph};
pub use editor::{Cursor, EditorState};
pub use node::{Node, NodeKey, TextAttrs, TextMode, TextNode, TextUnit, TokenNode};
pub use transaction::Transaction;
