//! Command-line argument parsing and output rendering
//!
//! Supports:
//! - Reading a file or stdin
//! - Feeding the input whole or one character at a time
//! - JSON or plain-text output of the settled document
//! - Writing the effective engine config to disk

use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

use spintax::config_paths::AppPaths;
use spintax::model::{EditorState, Node};
use spintax::tracing::LogSettings;
use spintax::EngineConfig;

/// Extract `{{A|B}}` tokens from text
#[derive(Parser, Debug)]
#[command(name = "spintax", version, about = "Extract {{A|B}} tokens from text")]
pub struct CliArgs {
    /// File to read (stdin when omitted)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Feed the input one character at a time, as if typed
    #[arg(long)]
    pub typed: bool,

    /// Config file to use instead of the one in the user config dir
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the effective config to the config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Console log filter when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,

    /// Only log to the console
    #[arg(long)]
    pub no_log_file: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The settled document as JSON
    Json,
    /// One line per paragraph listing its nodes
    Text,
}

/// Where the input comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

/// How the input reaches the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// One `SetText` update
    Whole,
    /// One update per character
    Typed,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: Source,
    pub input_mode: InputMode,
    pub format: OutputFormat,
    pub config_path: Option<PathBuf>,
    pub init_config: bool,
    pub logging: LogSettings,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> RunConfig {
        let source = match self.path {
            Some(path) if path.as_os_str() != "-" => Source::File(path),
            _ => Source::Stdin,
        };
        let input_mode = if self.typed {
            InputMode::Typed
        } else {
            InputMode::Whole
        };
        let logging = if self.no_log_file {
            LogSettings::console_only(&self.log_level)
        } else {
            LogSettings {
                console_level: self.log_level,
                ..LogSettings::default()
            }
        };
        RunConfig {
            source,
            input_mode,
            format: self.format,
            config_path: self.config,
            init_config: self.init_config,
            logging,
        }
    }
}

impl RunConfig {
    /// Engine settings from `--config`, or from the user config dir
    pub fn engine_config(&self) -> EngineConfig {
        match &self.config_path {
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        }
    }

    /// Config file `--init-config` writes to
    pub fn config_target(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| AppPaths::discover().map(|paths| paths.config_file()))
    }
}

/// Plain listing of the document, one line per paragraph
///
/// ```text
/// 1: "hello " [A / B] " " "world"
/// ```
pub fn render_listing(state: &EditorState) -> String {
    let mut out = String::new();
    for (line, paragraph) in state.tree.paragraphs().iter().enumerate() {
        let _ = write!(out, "{}:", line + 1);
        for node in &paragraph.children {
            match node {
                Node::Text(_) => {
                    let _ = write!(out, " {:?}", node.text());
                }
                Node::Token(_) => {
                    let label = state
                        .token_view(node.key())
                        .map(|view| view.label())
                        .unwrap_or_else(|| node.text().to_string());
                    let _ = write!(out, " [{}]", label);
                }
            }
        }
        out.push('\n');
    }
    out
}
