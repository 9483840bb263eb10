//! Data handed to whatever draws tokens
//!
//! Nothing here renders. A presentation layer reads [`TokenView`]s to decide
//! how to style a token and where to anchor its details popup, and reports
//! clicks back with `TokenMsg::Activate`.

use std::ops::Range;

use crate::model::NodeKey;
use crate::pattern::TokenFields;

/// A token as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenView {
    pub key: NodeKey,
    /// Literal token text including delimiters
    pub text: String,
    /// Parsed fields; `None` if the text was edited into something that is no longer a token
    pub fields: Option<TokenFields>,
    /// Line the token sits on
    pub line: usize,
    /// Character columns covered by the token
    pub columns: Range<usize>,
}

impl TokenView {
    /// Short label for a details popup, e.g. `A / B`
    pub fn label(&self) -> String {
        match &self.fields {
            Some(fields) if fields.is_blank() => "(empty)".to_string(),
            Some(fields) => format!("{} / {}", fields.left, fields.right),
            None => self.text.clone(),
        }
    }

    /// Whether a (line, column) hit falls on this token
    pub fn contains(&self, line: usize, column: usize) -> bool {
        self.line == line && self.columns.contains(&column)
    }
}
