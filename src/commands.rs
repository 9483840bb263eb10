//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::presentation::TokenView;

/// Side effects the host UI performs after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// The document changed and should be redrawn
    Redraw,
    /// Open the details popup for a token
    ShowTokenDetails(TokenView),
    /// Close the details popup
    HideTokenDetails,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw | Cmd::ShowTokenDetails(_) | Cmd::HideTokenDetails => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }
}
