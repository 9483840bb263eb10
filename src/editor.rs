//! The editor runtime - owns the committed state and settles every update
//!
//! ```text
//! update(edit)
//!   → clone committed state into a pending copy
//!   → edit(txn)              marks touched text units dirty
//!   → settle loop            pass = dirty units → every text transform → normalize
//!   → commit                 pending replaces committed
//!   → update listeners       once per committed update
//! ```
//!
//! Any error along the way drops the pending copy, so listeners only ever see
//! fully settled states.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::SettledUnit;
use crate::model::{EditorState, NodeKey, Transaction};
use crate::presentation::TokenView;
use crate::serialize::SerializedEditorState;
use crate::subscription::{Registry, Subscription};

/// Callback run on every settled plain text unit
pub type TextTransform =
    dyn FnMut(&mut Transaction<'_>, &SettledUnit) -> Result<(), EngineError>;

/// Callback run with each committed state
pub type UpdateListener = dyn FnMut(&EditorState);

/// Callback run when a token is activated
pub type TokenListener = dyn FnMut(&TokenView);

/// What the settle loop did for one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Settle passes run
    pub passes: usize,
    /// Settled units handed to transforms, summed over all passes
    pub units: usize,
}

/// A document plus the callbacks that keep it settled
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    config: EngineConfig,
    transforms: Registry<TextTransform>,
    update_listeners: Registry<UpdateListener>,
    token_listeners: Registry<TokenListener>,
    active_token: Option<NodeKey>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Editor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: EditorState::new(),
            config,
            transforms: Registry::default(),
            update_listeners: Registry::default(),
            token_listeners: Registry::default(),
            active_token: None,
        }
    }

    /// Start from plain text; nothing is settled until a transform is registered
    pub fn with_text(config: EngineConfig, text: &str) -> Self {
        let mut editor = Self::new(config);
        editor.state = EditorState::with_text(text);
        editor
    }

    /// The last committed state
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Token whose details are currently shown, if any
    pub fn active_token(&self) -> Option<NodeKey> {
        self.active_token
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Apply an edit, settle the result and commit it
    ///
    /// On error the committed state is left untouched and no listener runs.
    pub fn update<F>(&mut self, edit: F) -> Result<SettleReport, EngineError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<(), EngineError>,
    {
        let mut pending = self.state.clone();
        let report = {
            let mut txn = Transaction::new(&mut pending);
            edit(&mut txn)?;
            settle(&mut self.transforms, self.config.max_settle_passes, &mut txn)?
        };

        self.state = pending;
        if let Some(key) = self.active_token {
            if self.state.token_view(key).is_none() {
                self.active_token = None;
            }
        }

        tracing::debug!(
            passes = report.passes,
            units = report.units,
            tokens = self.state.token_count(),
            "committed update"
        );

        for listener in self.update_listeners.iter_mut() {
            listener(&self.state);
        }
        Ok(report)
    }

    /// Replace the document with plain text
    pub fn set_text(&mut self, text: &str) -> Result<SettleReport, EngineError> {
        self.update(|txn| {
            txn.set_document_text(text);
            Ok(())
        })
    }

    /// Insert text at the cursor
    pub fn insert_text(&mut self, text: &str) -> Result<SettleReport, EngineError> {
        self.update(|txn| txn.insert_text(text))
    }

    /// Replace the document with a serialized one
    pub fn load_state(
        &mut self,
        serialized: &SerializedEditorState,
    ) -> Result<SettleReport, EngineError> {
        self.update(|txn| txn.load(serialized))
    }

    pub fn load_json(&mut self, json: &str) -> Result<SettleReport, EngineError> {
        let serialized = SerializedEditorState::from_json(json)?;
        self.load_state(&serialized)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(self.state.to_json()?)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Install a transform over settled plain text units
    ///
    /// Every existing text unit is settled through it straight away. If that
    /// settle fails the transform is removed again and the error returned.
    pub fn register_text_transform<F>(&mut self, transform: F) -> Result<Subscription, EngineError>
    where
        F: FnMut(&mut Transaction<'_>, &SettledUnit) -> Result<(), EngineError> + 'static,
    {
        let subscription = self.transforms.insert(Box::new(transform));
        self.update(|txn| {
            txn.mark_all_text_dirty();
            Ok(())
        })?;
        Ok(subscription)
    }

    pub fn register_update_listener<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&EditorState) + 'static,
    {
        self.update_listeners.insert(Box::new(listener))
    }

    pub fn register_token_listener<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&TokenView) + 'static,
    {
        self.token_listeners.insert(Box::new(listener))
    }

    // =========================================================================
    // Token activation
    // =========================================================================

    /// Mark a token as active and tell token listeners about it
    ///
    /// Returns `None` if the key is not a token in the committed state.
    pub fn activate_token(&mut self, key: NodeKey) -> Option<TokenView> {
        let view = self.state.token_view(key)?;
        self.active_token = Some(key);
        for listener in self.token_listeners.iter_mut() {
            listener(&view);
        }
        Some(view)
    }

    /// Clear the active token; returns whether one was active
    pub fn dismiss_token(&mut self) -> bool {
        self.active_token.take().is_some()
    }
}

/// Run settle passes until no unit is dirty
fn settle(
    transforms: &mut Registry<TextTransform>,
    max_passes: usize,
    txn: &mut Transaction<'_>,
) -> Result<SettleReport, EngineError> {
    let mut report = SettleReport::default();
    txn.normalize();

    while txn.has_dirty() {
        if report.passes >= max_passes {
            tracing::warn!(passes = report.passes, "document did not settle, rolling back");
            return Err(EngineError::SettleLimitExceeded {
                passes: report.passes,
            });
        }

        let units = txn.take_settled_units();
        report.passes += 1;
        report.units += units.len();
        tracing::trace!(pass = report.passes, units = units.len(), "settle pass");

        for unit in &units {
            for transform in transforms.iter_mut() {
                transform(txn, unit)?;
            }
        }
        txn.normalize();
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeHost;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_update_without_transforms_commits() {
        let mut editor = Editor::default();
        let report = editor.insert_text("abc").unwrap();
        assert_eq!(editor.state().text_content(), "abc");
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn test_failed_update_leaves_state_untouched() {
        let mut editor = Editor::with_text(EngineConfig::default(), "keep");
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let _listener = editor.register_update_listener(move |_| *counter.borrow_mut() += 1);

        let result = editor.update(|txn| {
            txn.insert_text(" more")?;
            txn.split_text(NodeKey(999), &[1]).map(|_| ())
        });

        assert!(matches!(result, Err(EngineError::HostContractViolation(_))));
        assert_eq!(editor.state().text_content(), "keep");
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_transform_sees_existing_text_on_register() {
        let mut editor = Editor::with_text(EngineConfig::default(), "one\ntwo");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let _sub = editor
            .register_text_transform(move |_, unit| {
                log.borrow_mut().push(unit.text.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(*seen.borrow(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_settle_limit_rolls_back() {
        let config = EngineConfig {
            max_settle_passes: 5,
            ..EngineConfig::default()
        };
        let mut editor = Editor::with_text(config, "x");
        let _grow = editor.register_text_transform(|txn, unit| {
            if unit.text.len() < 3 {
                txn.set_text(unit.key, &format!("{}x", unit.text))?;
            }
            Ok(())
        });
        assert_eq!(editor.state().text_content(), "xxx");

        let mut editor = Editor::with_text(
            EngineConfig {
                max_settle_passes: 5,
                ..EngineConfig::default()
            },
            "x",
        );
        let result = editor.register_text_transform(|txn, unit| {
            txn.set_text(unit.key, &format!("{}x", unit.text))
        });
        assert!(matches!(
            result,
            Err(EngineError::SettleLimitExceeded { passes: 5 })
        ));
        assert_eq!(editor.state().text_content(), "x");
        assert!(editor.transforms.is_empty());
    }

    #[test]
    fn test_dropped_transform_stops_running() {
        let mut editor = Editor::default();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let sub = editor
            .register_text_transform(move |_, _| {
                *counter.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();
        editor.insert_text("a").unwrap();
        let after_first = *count.borrow();
        assert!(after_first > 0);

        drop(sub);
        editor.insert_text("b").unwrap();
        assert_eq!(*count.borrow(), after_first);
    }

    #[test]
    fn test_activate_unknown_token() {
        let mut editor = Editor::with_text(EngineConfig::default(), "abc");
        let key = editor.state().tree.text_keys()[0];
        assert!(editor.activate_token(key).is_none());
        assert!(!editor.dismiss_token());
    }
}
