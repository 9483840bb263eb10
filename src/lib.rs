//! spintax - live `{{A|B}}` token extraction for an editable document tree
//!
//! This crate provides the document model, the settle loop that keeps it
//! normalized after every edit, and the rewrite engine that turns delimited
//! token text into atomic token nodes. Edits flow through the Elm
//! Architecture pattern: [`Msg`] → [`update::update`] → [`Cmd`].

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editor;
pub mod error;
pub mod host;
pub mod matcher;
pub mod messages;
pub mod model;
pub mod pattern;
pub mod plugin;
pub mod presentation;
pub mod rewrite;
pub mod serialize;
pub mod subscription;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EngineConfig;
pub use editor::{Editor, SettleReport};
pub use error::EngineError;
pub use messages::Msg;
pub use model::{EditorState, NodeKey};
pub use plugin::TokenPlugin;
pub use presentation::TokenView;
pub use subscription::Subscription;
