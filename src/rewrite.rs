//! Token extraction - turns `{{A|B}}` typed into a text unit into a token node
//!
//! Runs once per settled plain text unit:
//!
//! ```text
//! "hello {{A|B}} world"
//!   → split   "hello " | "{{A|B}}" | " world"
//!   → replace "hello " | ""        | " world"
//!   → insert  "hello " | Token("{{A|B}}") | " " | "" | "world"
//!   → normalize (empty units dropped on the next pass boundary)
//! ```
//!
//! At most one token is extracted per call. The pieces left over are dirty,
//! so the settle loop hands them back and any further tokens are picked up on
//! later passes. Token nodes are never settled units, which bounds the loop.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::{NodeHost, SettledUnit};
use crate::matcher::{find_first, TokenCandidate};
use crate::model::{Node, NodeKey, TextUnit};
use crate::pattern::may_contain_token;
use crate::util::char_slice;

/// What a rewrite pass did with one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Text has no separator, matcher not consulted
    Skipped,
    /// Separator present but no token
    NoMatch,
    /// The unit is a token and is never rewritten
    Terminal,
    /// The unit changed or vanished since it settled; retried on the next pass
    Stale,
    /// A token was extracted
    Extracted {
        token: NodeKey,
        /// Number of pieces the unit was split into (1, 2 or 3)
        pieces: usize,
    },
}

impl RewriteOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, RewriteOutcome::Extracted { .. })
    }
}

/// Extract the first token from a settled unit with the default settings
pub fn rewrite_unit<H: NodeHost>(
    host: &mut H,
    unit: &SettledUnit,
) -> Result<RewriteOutcome, EngineError> {
    RewriteEngine::default().run(host, unit)
}

/// Stale units are reported as [`EngineError::StaleOffset`]
fn extract_first<H: NodeHost>(
    host: &mut H,
    unit: &SettledUnit,
    trailing_space: bool,
) -> Result<RewriteOutcome, EngineError> {
    let current = match host.node(unit.key) {
        Some(Node::Token(_)) => return Ok(RewriteOutcome::Terminal),
        Some(Node::Text(node)) => node.text().to_string(),
        None => return Ok(RewriteOutcome::Stale),
    };

    if !may_contain_token(&unit.text) {
        return Ok(RewriteOutcome::Skipped);
    }

    let Some(candidate) = find_first(&unit.text) else {
        tracing::trace!(key = unit.key.0, "no token in unit");
        return Ok(RewriteOutcome::NoMatch);
    };

    validate_offsets(unit, &current, &candidate)?;

    let (offsets, target_index) = if candidate.is_leading() {
        (vec![candidate.end()], 0)
    } else {
        (vec![candidate.offset, candidate.end()], 1)
    };
    let split = host.split_text(unit.key, &offsets)?;
    let Some(&target) = split.get(target_index) else {
        return Err(EngineError::host(format!(
            "split of node {} at {:?} returned {} piece(s)",
            unit.key.0,
            offsets,
            split.len()
        )));
    };
    let pieces = split.len();
    let remainder = split.get(target_index + 1).copied();

    let placeholder = host.replace_with_text(target, "")?;
    host.select_start_of(placeholder)?;

    let token = host.create_token(&candidate.matched_text);
    let token_key = token.key();
    let mut nodes = vec![token];
    if trailing_space {
        nodes.push(host.create_text(" "));
        if let Some(remainder) = remainder {
            absorb_leading_space(host, remainder)?;
        }
    }
    host.insert_at_cursor(nodes)?;

    tracing::debug!(
        key = unit.key.0,
        token = token_key.0,
        offset = candidate.offset,
        text = %candidate.matched_text,
        pieces,
        "extracted token"
    );

    Ok(RewriteOutcome::Extracted {
        token: token_key,
        pieces,
    })
}

/// Check that the match still lines up with the unit's current text
fn validate_offsets(
    unit: &SettledUnit,
    current: &str,
    candidate: &TokenCandidate,
) -> Result<(), EngineError> {
    let found = char_slice(current, candidate.offset, candidate.end());
    if current != unit.text || found != candidate.matched_text {
        return Err(EngineError::StaleOffset {
            key: unit.key,
            expected: candidate.matched_text.clone(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// The inserted space stands in for the one that already followed the token
fn absorb_leading_space<H: NodeHost>(host: &mut H, key: NodeKey) -> Result<(), EngineError> {
    let rest = match host.node(key) {
        Some(Node::Text(node)) => node.text().strip_prefix(' ').map(str::to_string),
        Some(Node::Token(_)) | None => None,
    };
    if let Some(rest) = rest {
        host.set_text(key, &rest)?;
    }
    Ok(())
}

/// The rewrite engine as installed into an editor
#[derive(Debug, Clone)]
pub struct RewriteEngine {
    trailing_space: bool,
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl RewriteEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            trailing_space: config.insert_trailing_space,
        }
    }

    /// Run one rewrite pass, failing with [`EngineError::StaleOffset`] on stale units
    pub fn extract<H: NodeHost>(
        &self,
        host: &mut H,
        unit: &SettledUnit,
    ) -> Result<RewriteOutcome, EngineError> {
        extract_first(host, unit, self.trailing_space)
    }

    /// Run one rewrite pass, absorbing stale offsets as a no-op
    pub fn run<H: NodeHost>(
        &self,
        host: &mut H,
        unit: &SettledUnit,
    ) -> Result<RewriteOutcome, EngineError> {
        match self.extract(host, unit) {
            Err(err) if err.is_recoverable() => {
                tracing::debug!("skipping rewrite: {}", err);
                Ok(RewriteOutcome::Stale)
            }
            result => result,
        }
    }
}
