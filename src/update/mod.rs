//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod edit;
mod token;

use crate::commands::Cmd;
use crate::editor::Editor;
use crate::error::EngineError;
use crate::messages::Msg;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use edit::update_edit;
pub use token::update_token;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(editor: &mut Editor, msg: Msg) -> Result<Option<Cmd>, EngineError> {
    #[cfg(debug_assertions)]
    {
        update_traced(editor, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(editor, msg)
    }
}

fn update_inner(editor: &mut Editor, msg: Msg) -> Result<Option<Cmd>, EngineError> {
    match msg {
        Msg::Edit(m) => edit::update_edit(editor, m),
        Msg::Token(m) => Ok(token::update_token(editor, m)),
    }
}

/// Traced update wrapper (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(editor: &mut Editor, msg: Msg) -> Result<Option<Cmd>, EngineError> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let tokens_before = editor.state().token_count();
    let result = update_inner(editor, msg);

    match &result {
        Ok(_) => {
            let tokens_after = editor.state().token_count();
            if tokens_after != tokens_before {
                debug!(
                    target: "tokens",
                    before = tokens_before,
                    after = tokens_after,
                    "token count changed"
                );
            }
        }
        Err(e) => debug!(target: "message", msg = %msg_name, error = %e, "update rejected"),
    }
    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Edit::InsertChar('x')`
/// - `Token::Activate(NodeKey(7))`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Edit(crate::messages::EditMsg::LoadState(_)) => "Edit::LoadState".to_string(),
        Msg::Edit(m) => format!("Edit::{:?}", m),
        Msg::Token(m) => format!("Token::{:?}", m),
    }
}
