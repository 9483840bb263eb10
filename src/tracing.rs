//! Logging setup
//!
//! Console output goes to stderr and is filtered by `RUST_LOG` when set,
//! otherwise by [`LogSettings::console_level`]:
//! - `RUST_LOG=spintax::rewrite=debug` - extraction and stale aborts
//! - `RUST_LOG=spintax::editor=debug` - one line per committed update
//! - `RUST_LOG=message=debug` - message handling spans (debug builds)
//!
//! The file layer writes everything at debug level to
//! `<logs dir>/spintax.log.YYYY-MM-DD`.

use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::{AppPaths, LOG_FILE_NAME};

/// Where and how loudly to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Console filter used when `RUST_LOG` is unset
    pub console_level: String,
    /// Directory for the rolling log file, or `None` for console only
    pub logs_dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_level: "warn".to_string(),
            logs_dir: AppPaths::discover().map(|paths| paths.logs_dir()),
        }
    }
}

impl LogSettings {
    pub fn console_only(console_level: &str) -> Self {
        Self {
            console_level: console_level.to_string(),
            logs_dir: None,
        }
    }
}

/// Install the global subscriber
pub fn init(settings: &LogSettings) {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.console_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = settings.logs_dir.as_ref().and_then(|dir| {
        match std::fs::create_dir_all(dir) {
            Ok(()) => Some(
                fmt::layer()
                    .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_NAME))
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            ),
            Err(e) => {
                eprintln!("Warning: no file logging in {}: {}", dir.display(), e);
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
