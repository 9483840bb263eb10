//! Error type for tree edits and token extraction

use crate::model::NodeKey;

/// Errors raised while editing or settling the document tree
///
/// A missing match is not an error. The matcher returns `None` and the
/// rewrite pass is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The unit's text changed between matching and splitting
    StaleOffset {
        key: NodeKey,
        expected: String,
        found: String,
    },
    /// The tree did not honour a split/replace/insert request
    HostContractViolation(String),
    /// Settling kept producing dirty units past the configured limit
    SettleLimitExceeded { passes: usize },
    /// Serialized state could not be loaded
    InvalidState(String),
}

impl EngineError {
    /// Shorthand for a host contract violation
    pub fn host(message: impl Into<String>) -> Self {
        EngineError::HostContractViolation(message.into())
    }

    /// Whether the error is absorbed by the rewrite pass instead of failing the update
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::StaleOffset { .. })
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::StaleOffset {
                key,
                expected,
                found,
            } => write!(
                f,
                "Stale offset in node {}: expected {:?}, found {:?}",
                key.0, expected, found
            ),
            EngineError::HostContractViolation(msg) => {
                write!(f, "Host contract violation: {}", msg)
            }
            EngineError::SettleLimitExceeded { passes } => {
                write!(f, "Document did not settle after {} passes", passes)
            }
            EngineError::InvalidState(msg) => write!(f, "Invalid editor state: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::InvalidState(e.to_string())
    }
}
