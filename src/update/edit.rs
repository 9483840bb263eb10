//! Document edit handlers

use crate::commands::Cmd;
use crate::editor::Editor;
use crate::error::EngineError;
use crate::messages::EditMsg;

/// Handle document edits
///
/// Every edit runs as one settled update. If it removes the token whose
/// details are open, the popup is closed as well.
pub fn update_edit(editor: &mut Editor, msg: EditMsg) -> Result<Option<Cmd>, EngineError> {
    let had_active = editor.active_token().is_some();

    let report = match msg {
        EditMsg::InsertChar(ch) => {
            let mut buf = [0u8; 4];
            let text: &str = ch.encode_utf8(&mut buf);
            editor.update(|txn| txn.insert_text(text))?
        }
        EditMsg::InsertText(text) => editor.update(|txn| txn.insert_text(&text))?,
        EditMsg::InsertNewline => editor.update(|txn| txn.insert_newline())?,
        EditMsg::DeleteBackward => editor.update(|txn| txn.delete_backward())?,
        EditMsg::DeleteForward => editor.update(|txn| txn.delete_forward())?,
        EditMsg::MoveCursor(direction) => editor.update(|txn| {
            txn.move_cursor(direction);
            Ok(())
        })?,
        EditMsg::SetCursor { line, column } => editor.update(|txn| {
            txn.set_cursor(line, column);
            Ok(())
        })?,
        EditMsg::SetText(text) => editor.set_text(&text)?,
        EditMsg::LoadState(state) => editor.load_state(&state)?,
    };

    tracing::trace!(passes = report.passes, units = report.units, "edit settled");

    if had_active && editor.active_token().is_none() {
        return Ok(Some(Cmd::Batch(vec![Cmd::Redraw, Cmd::HideTokenDetails])));
    }
    Ok(Some(Cmd::Redraw))
}
