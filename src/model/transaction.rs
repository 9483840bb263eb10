//! Transactions - every change to the document goes through one
//!
//! A transaction wraps a pending copy of the editor state. Edits and
//! rewrites mutate it and record which plain text units they touched; the
//! editor then settles those units and either commits the copy or drops it.

use std::collections::HashSet;

use super::document::{InsertPoint, Paragraph};
use super::editor::{Cursor, EditorState};
use super::node::{Node, NodeKey, TextNode, TextUnit, TokenNode};
use crate::error::EngineError;
use crate::host::{NodeHost, SettledUnit};
use crate::messages::Direction;
use crate::serialize::SerializedEditorState;
use crate::util::{char_to_byte, remove_char, split_at_chars};

/// A pending set of changes to an [`EditorState`]
#[derive(Debug)]
pub struct Transaction<'a> {
    state: &'a mut EditorState,
    dirty: HashSet<NodeKey>,
}

impl<'a> Transaction<'a> {
    pub fn new(state: &'a mut EditorState) -> Self {
        Self {
            state,
            dirty: HashSet::new(),
        }
    }

    pub fn state(&self) -> &EditorState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.state.cursor
    }

    // =========================================================================
    // Dirty tracking
    // =========================================================================

    /// Queue a unit for the next settle pass
    pub fn mark_dirty(&mut self, key: NodeKey) {
        self.dirty.insert(key);
    }

    /// Queue every plain text unit in the document
    pub fn mark_all_text_dirty(&mut self) {
        for key in self.state.tree.text_keys() {
            self.dirty.insert(key);
        }
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Drain the dirty set into settled units, in document order
    ///
    /// Tokens and nodes that no longer exist are dropped here, so only plain
    /// text ever reaches a transform.
    pub fn take_settled_units(&mut self) -> Vec<SettledUnit> {
        let dirty = std::mem::take(&mut self.dirty);
        self.state
            .tree
            .nodes()
            .filter_map(|node| match node {
                Node::Text(text) if dirty.contains(&text.key()) => Some(SettledUnit {
                    key: text.key(),
                    text: text.text().to_string(),
                }),
                Node::Text(_) | Node::Token(_) => None,
            })
            .collect()
    }

    /// Remove empty text units left behind by edits and rewrites
    pub fn normalize(&mut self) {
        for key in self.state.tree.normalize() {
            self.dirty.remove(&key);
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Insert text at the cursor; `\n` starts a new paragraph
    pub fn insert_text(&mut self, text: &str) -> Result<(), EngineError> {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.insert_newline()?;
            }
            if !line.is_empty() {
                self.insert_inline(line)?;
            }
        }
        Ok(())
    }

    fn insert_inline(&mut self, text: &str) -> Result<(), EngineError> {
        let Cursor { line, column } = self.state.cursor;
        let column = self.state.tree.snap_column(line, column);
        let point = self.state.tree.insert_point(line, column);

        let key = match point {
            InsertPoint::Text { index, offset } => {
                let paragraph = self.paragraph_mut(line)?;
                let Some(Node::Text(node)) = paragraph.children.get_mut(index) else {
                    return Err(EngineError::host("insert point is not a text unit"));
                };
                let mut content = node.text().to_string();
                content.insert_str(char_to_byte(&content, offset), text);
                node.set_text(&content);
                node.key()
            }
            InsertPoint::Between { index } => {
                let key = self.state.tree.alloc_key();
                let paragraph = self.paragraph_mut(line)?;
                paragraph
                    .children
                    .insert(index, Node::Text(TextNode::new(key, text)));
                key
            }
        };

        self.mark_dirty(key);
        self.state.cursor = Cursor::new(line, column + text.chars().count());
        Ok(())
    }

    /// Split the current paragraph at the cursor
    pub fn insert_newline(&mut self) -> Result<(), EngineError> {
        let Cursor { line, column } = self.state.cursor;
        let column = self.state.tree.snap_column(line, column);
        let paragraph_key = self.state.tree.alloc_key();
        let piece_key = self.state.tree.alloc_key();

        let paragraph = self.paragraph_mut(line)?;
        let mut split_index = paragraph.children.len();
        let mut cut = None;
        let mut start = 0;
        for (i, node) in paragraph.children.iter().enumerate() {
            let end = start + node.char_len();
            if column <= start {
                split_index = i;
                break;
            }
            if column < end {
                split_index = i + 1;
                cut = Some((i, column - start));
                break;
            }
            start = end;
        }

        let mut tail = paragraph.children.split_off(split_index);
        let mut touched = Vec::new();
        if let Some((index, offset)) = cut {
            if let Some(Node::Text(node)) = paragraph.children.get_mut(index) {
                let content = node.text().to_string();
                let byte = char_to_byte(&content, offset);
                node.set_text(&content[..byte]);
                let right = node.sibling(piece_key, &content[byte..]);
                touched.push(node.key());
                touched.push(piece_key);
                tail.insert(0, Node::Text(right));
            }
        }

        let mut new_paragraph = Paragraph::new(paragraph_key);
        new_paragraph.children = tail;
        self.state.tree.insert_paragraph(line + 1, new_paragraph);
        for key in touched {
            self.mark_dirty(key);
        }
        self.state.cursor = Cursor::new(line + 1, 0);
        Ok(())
    }

    /// Delete the character (or whole token) before the cursor
    pub fn delete_backward(&mut self) -> Result<(), EngineError> {
        let Cursor { line, column } = self.state.cursor;
        let column = self.state.tree.snap_column(line, column);

        if column == 0 {
            if line == 0 {
                return Ok(());
            }
            let join_column = self.paragraph_mut(line - 1)?.char_len();
            self.join_lines(line - 1)?;
            self.state.cursor = Cursor::new(line - 1, join_column);
            return Ok(());
        }

        let paragraph = self.paragraph_mut(line)?;
        let Some((index, start)) = paragraph.child_before(column) else {
            return Err(EngineError::host("cursor past end of paragraph"));
        };
        let new_column = match paragraph.children[index] {
            Node::Token(_) => start,
            Node::Text(_) => column - 1,
        };
        self.delete_in_child(line, index, column - 1 - start)?;
        self.state.cursor = Cursor::new(line, new_column);
        Ok(())
    }

    /// Delete the character (or whole token) after the cursor
    pub fn delete_forward(&mut self) -> Result<(), EngineError> {
        let Cursor { line, column } = self.state.cursor;
        let column = self.state.tree.snap_column(line, column);
        let line_count = self.state.tree.line_count();

        if column >= self.paragraph_mut(line)?.char_len() {
            if line + 1 >= line_count {
                return Ok(());
            }
            self.join_lines(line)?;
            self.state.cursor = Cursor::new(line, column);
            return Ok(());
        }

        let paragraph = self.paragraph_mut(line)?;
        let Some((index, start)) = paragraph.child_at(column) else {
            return Err(EngineError::host("cursor past end of paragraph"));
        };
        self.delete_in_child(line, index, column - start)?;
        self.state.cursor = Cursor::new(line, column);
        Ok(())
    }

    /// Delete one character of a text unit, or a whole token
    ///
    /// A unit that ends up empty is removed on the spot so its neighbours can
    /// merge.
    fn delete_in_child(
        &mut self,
        line: usize,
        index: usize,
        offset: usize,
    ) -> Result<(), EngineError> {
        let paragraph = self.paragraph_mut(line)?;
        let emptied = match &mut paragraph.children[index] {
            Node::Token(_) => true,
            Node::Text(node) => {
                let mut content = node.text().to_string();
                remove_char(&mut content, offset);
                node.set_text(&content);
                content.is_empty()
            }
        };
        if !emptied {
            let key = paragraph.children[index].key();
            self.mark_dirty(key);
            return Ok(());
        }
        let removed = paragraph.children.remove(index);
        self.dirty.remove(&removed.key());
        self.merge_text_at(line, index)
    }

    /// Append line `line + 1` to line `line`
    fn join_lines(&mut self, line: usize) -> Result<(), EngineError> {
        let removed = self.state.tree.remove_paragraph(line + 1);
        let paragraph = self.paragraph_mut(line)?;
        let seam = paragraph.children.len();
        paragraph.children.extend(removed.children);
        self.merge_text_at(line, seam)
    }

    /// Merge the text units either side of child `index` if their attributes match
    ///
    /// Used where an edit makes two text units adjacent. A token split across
    /// them only becomes visible to the matcher once they are one unit, so the
    /// merged unit is queued for settling.
    fn merge_text_at(&mut self, line: usize, index: usize) -> Result<(), EngineError> {
        let paragraph = self.paragraph_mut(line)?;
        if index == 0 || index >= paragraph.children.len() {
            return Ok(());
        }
        let (before, after) = paragraph.children.split_at_mut(index);
        let (Some(Node::Text(left)), Some(Node::Text(right))) =
            (before.last_mut(), after.first())
        else {
            return Ok(());
        };
        if left.attrs() != right.attrs() {
            return Ok(());
        }

        let mut content = left.text().to_string();
        content.push_str(right.text());
        left.set_text(&content);
        let kept = left.key();
        let gone = right.key();
        paragraph.children.remove(index);

        self.dirty.remove(&gone);
        self.mark_dirty(kept);
        Ok(())
    }

    /// Move the cursor one step, treating each token as a single character
    pub fn move_cursor(&mut self, direction: Direction) {
        let tree = &self.state.tree;
        let Cursor { line, column } = self.state.cursor;
        let column = tree.snap_column(line, column);
        let Some(paragraph) = tree.paragraph(line) else {
            return;
        };

        self.state.cursor = match direction {
            Direction::Left if column > 0 => match paragraph.child_before(column) {
                Some((index, start)) if paragraph.children[index].is_token() => {
                    Cursor::new(line, start)
                }
                _ => Cursor::new(line, column - 1),
            },
            Direction::Left if line > 0 => {
                let len = tree.paragraph(line - 1).map_or(0, |p| p.char_len());
                Cursor::new(line - 1, len)
            }
            Direction::Right if column < paragraph.char_len() => {
                match paragraph.child_at(column) {
                    Some((index, start)) if paragraph.children[index].is_token() => {
                        Cursor::new(line, start + paragraph.children[index].char_len())
                    }
                    _ => Cursor::new(line, column + 1),
                }
            }
            Direction::Right if line + 1 < tree.line_count() => Cursor::new(line + 1, 0),
            Direction::Up if line > 0 => Cursor::new(line - 1, tree.snap_column(line - 1, column)),
            Direction::Down if line + 1 < tree.line_count() => {
                Cursor::new(line + 1, tree.snap_column(line + 1, column))
            }
            _ => Cursor::new(line, column),
        };
    }

    /// Place the cursor, clamped to the document and moved out of tokens
    pub fn set_cursor(&mut self, line: usize, column: usize) {
        let line = line.min(self.state.tree.line_count().saturating_sub(1));
        let column = self.state.tree.snap_column(line, column);
        self.state.cursor = Cursor::new(line, column);
    }

    /// Replace the whole document with plain text and queue it for settling
    pub fn set_document_text(&mut self, text: &str) {
        self.dirty.clear();
        self.state.tree.reset_to_text(text);
        self.mark_all_text_dirty();
        self.move_to_end();
    }

    /// Replace the whole document with a serialized one and queue it for settling
    pub fn load(&mut self, serialized: &SerializedEditorState) -> Result<(), EngineError> {
        self.state.tree.reset_to_serialized(serialized)?;
        self.dirty.clear();
        self.mark_all_text_dirty();
        self.move_to_end();
        Ok(())
    }

    fn move_to_end(&mut self) {
        let line = self.state.tree.line_count().saturating_sub(1);
        let column = self.state.tree.paragraph(line).map_or(0, |p| p.char_len());
        self.state.cursor = Cursor::new(line, column);
    }

    fn paragraph_mut(&mut self, line: usize) -> Result<&mut Paragraph, EngineError> {
        self.state
            .tree
            .paragraph_mut(line)
            .ok_or_else(|| EngineError::host(format!("no paragraph at line {}", line)))
    }

    fn locate(&self, key: NodeKey) -> Result<(usize, usize), EngineError> {
        self.state
            .tree
            .locate(key)
            .ok_or_else(|| EngineError::host(format!("node {} is not in the tree", key.0)))
    }
}

impl NodeHost for Transaction<'_> {
    fn node(&self, key: NodeKey) -> Option<&Node> {
        self.state.tree.node(key)
    }

    fn split_text(&mut self, key: NodeKey, offsets: &[usize]) -> Result<Vec<NodeKey>, EngineError> {
        let (line, index) = self.locate(key)?;
        let Some(Node::Text(node)) = self.state.tree.node(key) else {
            return Err(EngineError::host(format!("node {} is not plain text", key.0)));
        };
        let original = node.clone();
        let pieces: Vec<String> = split_at_chars(original.text(), offsets)
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut keys = vec![key];
        let mut siblings = Vec::with_capacity(pieces.len().saturating_sub(1));
        for piece in &pieces[1..] {
            let piece_key = self.state.tree.alloc_key();
            keys.push(piece_key);
            siblings.push(Node::Text(original.sibling(piece_key, piece)));
        }

        let paragraph = self.paragraph_mut(line)?;
        if let Node::Text(first) = &mut paragraph.children[index] {
            first.set_text(&pieces[0]);
        }
        let tail = paragraph.children.split_off(index + 1);
        paragraph.children.extend(siblings);
        paragraph.children.extend(tail);

        for &piece_key in &keys {
            self.mark_dirty(piece_key);
        }
        Ok(keys)
    }

    fn replace_with_text(&mut self, key: NodeKey, text: &str) -> Result<NodeKey, EngineError> {
        let (line, index) = self.locate(key)?;
        let new_key = self.state.tree.alloc_key();
        let paragraph = self.paragraph_mut(line)?;
        paragraph.children[index] = Node::Text(TextNode::new(new_key, text));
        self.dirty.remove(&key);
        self.mark_dirty(new_key);
        Ok(new_key)
    }

    fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), EngineError> {
        match self.state.tree.node_mut(key) {
            Some(Node::Text(node)) => {
                if node.text() != text {
                    node.set_text(text);
                    self.dirty.insert(key);
                }
                Ok(())
            }
            Some(Node::Token(_)) => Err(EngineError::host(format!(
                "cannot set text of token {} as plain text",
                key.0
            ))),
            None => Err(EngineError::host(format!(
                "node {} is not in the tree",
                key.0
            ))),
        }
    }

    fn select_start_of(&mut self, key: NodeKey) -> Result<(), EngineError> {
        let (line, index) = self.locate(key)?;
        let column = self.paragraph_mut(line)?.column_of(index);
        self.state.cursor = Cursor::new(line, column);
        Ok(())
    }

    fn insert_at_cursor(&mut self, nodes: Vec<Node>) -> Result<Vec<NodeKey>, EngineError> {
        let Cursor { line, column } = self.state.cursor;
        let column = self.state.tree.snap_column(line, column);

        let index = match self.state.tree.insert_point(line, column) {
            InsertPoint::Between { index } => index,
            InsertPoint::Text { index, offset } => {
                let paragraph = self.paragraph_mut(line)?;
                let node = &paragraph.children[index];
                if offset == 0 {
                    index
                } else if offset >= node.char_len() {
                    index + 1
                } else {
                    let key = node.key();
                    self.split_text(key, &[offset])?;
                    index + 1
                }
            }
        };

        let inserted: usize = nodes.iter().map(|n| n.char_len()).sum();
        let keys: Vec<NodeKey> = nodes.iter().map(|n| n.key()).collect();
        for node in &nodes {
            if let Node::Text(text) = node {
                self.dirty.insert(text.key());
            }
        }

        let paragraph = self.paragraph_mut(line)?;
        let tail = paragraph.children.split_off(index);
        paragraph.children.extend(nodes);
        paragraph.children.extend(tail);
        self.state.cursor = Cursor::new(line, column + inserted);
        Ok(keys)
    }

    fn create_token(&mut self, text: &str) -> Node {
        let key = self.state.tree.alloc_key();
        Node::Token(TokenNode::new(key, text))
    }

    fn create_text(&mut self, text: &str) -> Node {
        let key = self.state.tree.alloc_key();
        Node::Text(TextNode::new(key, text))
    }
}
