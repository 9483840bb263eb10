//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use spintax::model::{EditorState, Node};
use spintax::{Editor, EngineConfig, TokenPlugin};

/// One leaf as seen in assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Text(String),
    Token(String),
}

pub fn text(s: &str) -> Leaf {
    Leaf::Text(s.to_string())
}

pub fn token(s: &str) -> Leaf {
    Leaf::Token(s.to_string())
}

/// Every leaf of the document in order, paragraphs flattened
pub fn leaves(state: &EditorState) -> Vec<Leaf> {
    state
        .tree
        .nodes()
        .map(|node| match node {
            Node::Text(_) => Leaf::Text(node.text().to_string()),
            Node::Token(_) => Leaf::Token(node.text().to_string()),
        })
        .collect()
}

/// Leaves of a single line
pub fn line_leaves(state: &EditorState, line: usize) -> Vec<Leaf> {
    state
        .tree
        .paragraph(line)
        .map(|p| {
            p.children
                .iter()
                .map(|node| match node {
                    Node::Text(_) => Leaf::Text(node.text().to_string()),
                    Node::Token(_) => Leaf::Token(node.text().to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Text of every token in document order
pub fn token_texts(state: &EditorState) -> Vec<String> {
    state
        .tree
        .nodes()
        .filter(|n| n.is_token())
        .map(|n| n.text().to_string())
        .collect()
}

/// Editor with token extraction installed, starting empty
pub fn test_editor() -> (Editor, TokenPlugin) {
    test_editor_with(EngineConfig::default(), "")
}

/// Editor holding `initial` with token extraction installed (and already settled)
pub fn test_editor_with(config: EngineConfig, initial: &str) -> (Editor, TokenPlugin) {
    let mut editor = Editor::with_text(config, initial);
    let plugin = TokenPlugin::install(&mut editor).expect("plugin installs");
    (editor, plugin)
}

/// Feed text one character at a time, newlines included
pub fn type_text(editor: &mut Editor, input: &str) {
    use spintax::messages::{EditMsg, Msg};
    for ch in input.chars() {
        let msg = match ch {
            '\n' => EditMsg::InsertNewline,
            ch => EditMsg::InsertChar(ch),
        };
        spintax::update::update(editor, Msg::Edit(msg)).expect("edit settles");
    }
}
