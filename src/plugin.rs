//! Installs token extraction into an [`Editor`]
//!
//! The plugin owns two subscriptions: the rewrite engine as a text transform
//! and a change listener relaying each committed state to the caller. Both
//! are removed when the plugin is dropped.

use crate::editor::Editor;
use crate::error::EngineError;
use crate::model::EditorState;
use crate::rewrite::RewriteEngine;
use crate::subscription::Subscription;

/// Token extraction attached to an editor
#[derive(Debug)]
pub struct TokenPlugin {
    _transform: Subscription,
    _listener: Subscription,
}

impl TokenPlugin {
    /// Register token extraction and an `on_change` observer
    ///
    /// `on_change` runs once per committed update, including the initial
    /// settle of whatever text the editor already holds.
    pub fn register<F>(editor: &mut Editor, on_change: F) -> Result<Self, EngineError>
    where
        F: FnMut(&EditorState) + 'static,
    {
        let listener = editor.register_update_listener(on_change);
        let engine = RewriteEngine::new(editor.config());
        let transform = editor.register_text_transform(move |txn, unit| {
            engine.run(txn, unit).map(|_| ())
        })?;

        tracing::debug!("token extraction registered");
        Ok(Self {
            _transform: transform,
            _listener: listener,
        })
    }

    /// Register token extraction with no observer
    pub fn install(editor: &mut Editor) -> Result<Self, EngineError> {
        Self::register(editor, |_| {})
    }

    /// Remove both subscriptions now
    pub fn dispose(self) {}
}
