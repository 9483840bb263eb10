//! Token activation handlers

use crate::commands::Cmd;
use crate::editor::Editor;
use crate::messages::TokenMsg;

/// Handle clicks on tokens and closing of the details popup
pub fn update_token(editor: &mut Editor, msg: TokenMsg) -> Option<Cmd> {
    match msg {
        TokenMsg::Activate(key) => match editor.activate_token(key) {
            Some(view) => Some(Cmd::ShowTokenDetails(view)),
            None => {
                tracing::debug!(key = key.0, "activation of unknown token ignored");
                None
            }
        },
        TokenMsg::Dismiss => editor.dismiss_token().then_some(Cmd::HideTokenDetails),
    }
}
