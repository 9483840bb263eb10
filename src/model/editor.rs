//! Editor state - the document tree plus the edit cursor

use super::document::DocumentTree;
use super::node::{Node, NodeKey, TextUnit};
use crate::presentation::TokenView;
use crate::serialize::SerializedEditorState;

/// Cursor position in the document
///
/// `column` counts characters across the whole paragraph, tokens included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Cursor {
    /// Create a new cursor at position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A settled snapshot of the document, as handed to observers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub tree: DocumentTree,
    pub cursor: Cursor,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state holding `text`, with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        let tree = DocumentTree::from_text(text);
        let line = tree.line_count() - 1;
        let column = tree.paragraph(line).map_or(0, |p| p.char_len());
        Self {
            tree,
            cursor: Cursor::new(line, column),
        }
    }

    /// Full plain text of the document
    pub fn text_content(&self) -> String {
        self.tree.text_content()
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.tree.node(key)
    }

    /// Number of extracted tokens in the document
    pub fn token_count(&self) -> usize {
        self.tree.tokens().count()
    }

    /// Presentation data for one token
    pub fn token_view(&self, key: NodeKey) -> Option<TokenView> {
        let (line, index) = self.tree.locate(key)?;
        let paragraph = self.tree.paragraph(line)?;
        let token = paragraph.children.get(index)?.as_token()?;
        let start = paragraph.column_of(index);
        Some(TokenView {
            key,
            text: token.text().to_string(),
            fields: token.fields(),
            line,
            columns: start..start + token.char_len(),
        })
    }

    /// Presentation data for every token, in document order
    pub fn token_views(&self) -> Vec<TokenView> {
        self.tree
            .tokens()
            .filter_map(|token| self.token_view(token.key()))
            .collect()
    }

    pub fn to_serialized(&self) -> SerializedEditorState {
        self.tree.to_serialized()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.to_serialized().to_json()
    }
}
