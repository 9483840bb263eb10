//! Document tree - paragraphs of text units and tokens

use super::node::{Node, NodeKey, TextNode, TextUnit, TokenNode};
use crate::error::EngineError;
use crate::serialize::{
    SerializedEditorState, SerializedParagraph, SerializedRoot, PARAGRAPH_TYPE, ROOT_TYPE,
    VERSION,
};

/// One line of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub key: NodeKey,
    pub children: Vec<Node>,
}

impl Paragraph {
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            children: Vec::new(),
        }
    }

    /// Concatenated text of all children
    pub fn text(&self) -> String {
        self.children.iter().map(|n| n.text()).collect()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.children.iter().map(|n| n.char_len()).sum()
    }

    /// Column at which the child at `index` starts
    pub fn column_of(&self, index: usize) -> usize {
        self.children[..index.min(self.children.len())]
            .iter()
            .map(|n| n.char_len())
            .sum()
    }

    /// Index of the child whose span contains the character *before* `column`
    ///
    /// Returns the child index and the column the child starts at.
    pub fn child_before(&self, column: usize) -> Option<(usize, usize)> {
        if column == 0 {
            return None;
        }
        let mut start = 0;
        for (i, node) in self.children.iter().enumerate() {
            let end = start + node.char_len();
            if start < column && column <= end {
                return Some((i, start));
            }
            start = end;
        }
        None
    }

    /// Index of the child whose span contains the character *at* `column`
    pub fn child_at(&self, column: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, node) in self.children.iter().enumerate() {
            let end = start + node.char_len();
            if start <= column && column < end {
                return Some((i, start));
            }
            start = end;
        }
        None
    }
}

/// Where text typed at a column should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPoint {
    /// Inside (or at either edge of) an existing text unit
    Text { index: usize, offset: usize },
    /// Between children, where a new text unit must be created
    Between { index: usize },
}

/// The document tree
///
/// Always holds at least one paragraph. Node keys are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTree {
    paragraphs: Vec<Paragraph>,
    next_key: u64,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Create a tree with one empty paragraph
    pub fn new() -> Self {
        let mut tree = Self {
            paragraphs: Vec::new(),
            next_key: 1,
        };
        let key = tree.alloc_key();
        tree.paragraphs.push(Paragraph::new(key));
        tree
    }

    /// Create a tree with one paragraph per line, each holding a single text unit
    pub fn from_text(text: &str) -> Self {
        let mut tree = Self {
            paragraphs: Vec::new(),
            next_key: 1,
        };
        tree.reset_to_text(text);
        tree
    }

    /// Replace the whole content with plain text, keeping the key allocator
    pub(crate) fn reset_to_text(&mut self, text: &str) {
        self.paragraphs.clear();
        for line in text.split('\n') {
            let key = self.alloc_key();
            let mut paragraph = Paragraph::new(key);
            if !line.is_empty() {
                let node_key = self.alloc_key();
                paragraph
                    .children
                    .push(Node::Text(TextNode::new(node_key, line)));
            }
            self.paragraphs.push(paragraph);
        }
    }

    /// Allocate a fresh node key
    pub fn alloc_key(&mut self) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        key
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, line: usize) -> Option<&Paragraph> {
        self.paragraphs.get(line)
    }

    pub fn paragraph_mut(&mut self, line: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(line)
    }

    pub fn line_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub(crate) fn insert_paragraph(&mut self, line: usize, paragraph: Paragraph) {
        self.paragraphs.insert(line, paragraph);
    }

    pub(crate) fn remove_paragraph(&mut self, line: usize) -> Paragraph {
        self.paragraphs.remove(line)
    }

    /// Full plain text, lines joined by `\n`
    pub fn text_content(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Find a node, returning its line and child index
    pub fn locate(&self, key: NodeKey) -> Option<(usize, usize)> {
        self.paragraphs.iter().enumerate().find_map(|(line, p)| {
            p.children
                .iter()
                .position(|n| n.key() == key)
                .map(|index| (line, index))
        })
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        let (line, index) = self.locate(key)?;
        self.paragraphs[line].children.get(index)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        let (line, index) = self.locate(key)?;
        self.paragraphs[line].children.get_mut(index)
    }

    /// Iterate over every leaf in document order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.paragraphs.iter().flat_map(|p| p.children.iter())
    }

    /// Every token in document order
    pub fn tokens(&self) -> impl Iterator<Item = &TokenNode> {
        self.nodes().filter_map(|n| n.as_token())
    }

    /// Keys of every plain text unit in document order
    pub fn text_keys(&self) -> Vec<NodeKey> {
        self.nodes()
            .filter_map(|n| n.as_text())
            .map(|n| n.key())
            .collect()
    }

    /// Clamp a column to the line and move it out of any token it falls inside
    pub fn snap_column(&self, line: usize, column: usize) -> usize {
        let Some(paragraph) = self.paragraphs.get(line) else {
            return 0;
        };
        let column = column.min(paragraph.char_len());
        let mut start = 0;
        for node in &paragraph.children {
            let end = start + node.char_len();
            if node.is_token() && start < column && column < end {
                return end;
            }
            start = end;
        }
        column
    }

    /// Resolve where text typed at (`line`, `column`) belongs
    ///
    /// A text unit ending at the column wins over one starting there, so
    /// typing continues the run to the left of the cursor.
    pub fn insert_point(&self, line: usize, column: usize) -> InsertPoint {
        let Some(paragraph) = self.paragraphs.get(line) else {
            return InsertPoint::Between { index: 0 };
        };

        let mut start = 0;
        let mut starting_here = None;
        let mut between = paragraph.children.len();
        for (i, node) in paragraph.children.iter().enumerate() {
            let end = start + node.char_len();
            if let Node::Text(_) = node {
                if start < column && column <= end {
                    return InsertPoint::Text {
                        index: i,
                        offset: column - start,
                    };
                }
                if start == column && starting_here.is_none() {
                    starting_here = Some(i);
                }
            }
            if start >= column && between == paragraph.children.len() {
                between = i;
            }
            start = end;
        }

        match starting_here {
            Some(index) => InsertPoint::Text { index, offset: 0 },
            None => InsertPoint::Between { index: between },
        }
    }

    /// Drop empty plain text units, returning their keys
    pub fn normalize(&mut self) -> Vec<NodeKey> {
        let mut removed = Vec::new();
        for paragraph in &mut self.paragraphs {
            paragraph.children.retain(|node| match node {
                Node::Text(text) if text.text().is_empty() => {
                    removed.push(text.key());
                    false
                }
                _ => true,
            });
        }
        removed
    }

    pub fn to_serialized(&self) -> SerializedEditorState {
        SerializedEditorState {
            root: SerializedRoot {
                children: self
                    .paragraphs
                    .iter()
                    .map(|p| SerializedParagraph {
                        children: p.children.iter().map(|n| n.serialize()).collect(),
                        node_type: PARAGRAPH_TYPE.to_string(),
                        version: VERSION,
                    })
                    .collect(),
                node_type: ROOT_TYPE.to_string(),
                version: VERSION,
            },
        }
    }

    /// Rebuild a tree from its serialized form, assigning fresh keys
    pub fn from_serialized(state: &SerializedEditorState) -> Result<Self, EngineError> {
        let mut tree = Self {
            paragraphs: Vec::new(),
            next_key: 1,
        };
        tree.reset_to_serialized(state)?;
        Ok(tree)
    }

    /// Replace the whole content with a serialized document
    ///
    /// The tree is left untouched if the record is malformed.
    pub(crate) fn reset_to_serialized(
        &mut self,
        state: &SerializedEditorState,
    ) -> Result<(), EngineError> {
        if state.root.node_type != ROOT_TYPE {
            return Err(EngineError::InvalidState(format!(
                "expected root node, found '{}'",
                state.root.node_type
            )));
        }

        let mut next_key = self.next_key;
        let mut alloc = || {
            let key = NodeKey(next_key);
            next_key += 1;
            key
        };

        let mut paragraphs = Vec::with_capacity(state.root.children.len());
        for record in &state.root.children {
            if record.node_type != PARAGRAPH_TYPE {
                return Err(EngineError::InvalidState(format!(
                    "expected paragraph node, found '{}'",
                    record.node_type
                )));
            }
            let mut paragraph = Paragraph::new(alloc());
            for child in &record.children {
                paragraph.children.push(Node::deserialize(alloc(), child)?);
            }
            paragraphs.push(paragraph);
        }
        if paragraphs.is_empty() {
            paragraphs.push(Paragraph::new(alloc()));
        }

        self.paragraphs = paragraphs;
        self.next_key = next_key;
        Ok(())
    }
}
