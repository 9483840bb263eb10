//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::model::NodeKey;
use crate::serialize::SerializedEditorState;

/// Direction for cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Document edits; each one is settled and committed as a single update
#[derive(Debug, Clone)]
pub enum EditMsg {
    /// Insert a character at cursor
    InsertChar(char),
    /// Insert a string at cursor (paste)
    InsertText(String),
    /// Insert a newline at cursor
    InsertNewline,
    /// Delete character before cursor (Backspace)
    DeleteBackward,
    /// Delete character after cursor (Delete)
    DeleteForward,
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Set cursor to specific position (from mouse click)
    SetCursor { line: usize, column: usize },
    /// Replace the whole document with plain text
    SetText(String),
    /// Replace the whole document with a saved state
    LoadState(SerializedEditorState),
}

/// Token interaction reported by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMsg {
    /// A token was clicked
    Activate(NodeKey),
    /// The details popup was closed
    Dismiss,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Edit(EditMsg),
    Token(TokenMsg),
}

impl From<EditMsg> for Msg {
    fn from(msg: EditMsg) -> Self {
        Msg::Edit(msg)
    }
}

impl From<TokenMsg> for Msg {
    fn from(msg: TokenMsg) -> Self {
        Msg::Token(msg)
    }
}
