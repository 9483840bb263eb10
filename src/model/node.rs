//! Leaf nodes of the document tree: plain text units and extracted tokens

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::pattern::{parse_fields, TokenFields};
use crate::serialize::{SerializedTextNode, TEXT_TYPE, TOKEN_TYPE};

/// Unique identifier for a node, assigned by the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(pub u64);

/// How a text unit behaves under editing (carried through for round-trips)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Normal,
    Token,
    Segmented,
}

/// Formatting bits shared by every text-bearing node
///
/// The engine never interprets these; they are copied verbatim onto every
/// piece when a unit is split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAttrs {
    pub format: u32,
    pub detail: u32,
    pub mode: TextMode,
    pub style: String,
}

impl TextAttrs {
    fn from_serialized(record: &SerializedTextNode) -> Self {
        Self {
            format: record.format,
            detail: record.detail,
            mode: record.mode,
            style: record.style.clone(),
        }
    }
}

/// Capabilities common to plain text units and tokens
pub trait TextUnit {
    fn key(&self) -> NodeKey;
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
    fn attrs(&self) -> &TextAttrs;
    fn attrs_mut(&mut self) -> &mut TextAttrs;

    /// Length in characters
    fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    fn format(&self) -> u32 {
        self.attrs().format
    }

    fn set_format(&mut self, format: u32) {
        self.attrs_mut().format = format;
    }

    fn detail(&self) -> u32 {
        self.attrs().detail
    }

    fn set_detail(&mut self, detail: u32) {
        self.attrs_mut().detail = detail;
    }

    fn mode(&self) -> TextMode {
        self.attrs().mode
    }

    fn set_mode(&mut self, mode: TextMode) {
        self.attrs_mut().mode = mode;
    }

    fn style(&self) -> &str {
        &self.attrs().style
    }

    fn set_style(&mut self, style: &str) {
        self.attrs_mut().style = style.to_string();
    }
}

/// A run of plain characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    key: NodeKey,
    text: String,
    attrs: TextAttrs,
}

impl TextNode {
    pub fn new(key: NodeKey, text: &str) -> Self {
        Self {
            key,
            text: text.to_string(),
            attrs: TextAttrs::default(),
        }
    }

    /// Create a node with the same attributes as this one but a new key and text
    pub fn sibling(&self, key: NodeKey, text: &str) -> Self {
        Self {
            key,
            text: text.to_string(),
            attrs: self.attrs.clone(),
        }
    }

    pub fn serialize(&self) -> SerializedTextNode {
        SerializedTextNode::from_parts(&self.text, &self.attrs, TEXT_TYPE)
    }

    pub fn deserialize(key: NodeKey, record: &SerializedTextNode) -> Self {
        Self {
            key,
            text: record.text.clone(),
            attrs: TextAttrs::from_serialized(record),
        }
    }
}

impl TextUnit for TextNode {
    fn key(&self) -> NodeKey {
        self.key
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn attrs(&self) -> &TextAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut TextAttrs {
        &mut self.attrs
    }
}

/// An extracted token such as `{{A|B}}`
///
/// Tokens are terminal: once created they are never handed back to the
/// matcher, which is what keeps the rewrite/settle loop finite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNode {
    key: NodeKey,
    text: String,
    attrs: TextAttrs,
}

impl TokenNode {
    pub fn new(key: NodeKey, text: &str) -> Self {
        Self {
            key,
            text: text.to_string(),
            attrs: TextAttrs::default(),
        }
    }

    /// The two fields of the token, if its text is still well-formed
    pub fn fields(&self) -> Option<TokenFields> {
        parse_fields(&self.text)
    }

    pub fn serialize(&self) -> SerializedTextNode {
        SerializedTextNode::from_parts(&self.text, &self.attrs, TOKEN_TYPE)
    }

    pub fn deserialize(key: NodeKey, record: &SerializedTextNode) -> Self {
        let mut node = Self::new(key, &record.text);
        node.set_format(record.format);
        node.set_detail(record.detail);
        node.set_mode(record.mode);
        node.set_style(&record.style);
        node
    }
}

impl TextUnit for TokenNode {
    fn key(&self) -> NodeKey {
        self.key
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn attrs(&self) -> &TextAttrs {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut TextAttrs {
        &mut self.attrs
    }
}

/// A leaf in a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(TextNode),
    Token(TokenNode),
}

impl Node {
    pub fn key(&self) -> NodeKey {
        self.unit().key()
    }

    pub fn text(&self) -> &str {
        self.unit().text()
    }

    pub fn char_len(&self) -> usize {
        self.unit().char_len()
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Node::Token(_))
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(node) => Some(node),
            Node::Token(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            Node::Text(node) => Some(node),
            Node::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&TokenNode> {
        match self {
            Node::Token(node) => Some(node),
            Node::Text(_) => None,
        }
    }

    /// Borrow the shared text-unit capabilities
    pub fn unit(&self) -> &dyn TextUnit {
        match self {
            Node::Text(node) => node,
            Node::Token(node) => node,
        }
    }

    pub fn serialize(&self) -> SerializedTextNode {
        match self {
            Node::Text(node) => node.serialize(),
            Node::Token(node) => node.serialize(),
        }
    }

    /// Rebuild a node from its record, dispatching on the record's `type`
    pub fn deserialize(key: NodeKey, record: &SerializedTextNode) -> Result<Self, EngineError> {
        match record.node_type.as_str() {
            TEXT_TYPE => Ok(Node::Text(TextNode::deserialize(key, record))),
            TOKEN_TYPE => Ok(Node::Token(TokenNode::deserialize(key, record))),
            other => Err(EngineError::InvalidState(format!(
                "unknown node type '{}'",
                other
            ))),
        }
    }
}
