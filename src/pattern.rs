//! Token grammar
//!
//! A token is a pair of double braces around two fields separated by a pipe:
//! `{{left|right}}`. Either field may be empty, so `{{|}}`, `{{A|}}` and
//! `{{|B}}` are all tokens and can be filled in later. Fields never contain
//! braces or pipes, and a token without a separator (`{{A}}`) is not a token.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between the two fields of a token
pub const SEPARATOR: char = '|';

/// Opening delimiter
pub const OPEN: &str = "{{";

/// Closing delimiter
pub const CLOSE: &str = "}}";

/// Anchored so that the whole candidate must be a single token
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\{([^|{}]*)\|([^|{}]*)\}\}$").unwrap());

/// The two fields of a recognized token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFields {
    pub left: String,
    pub right: String,
}

impl TokenFields {
    /// True when neither field has been filled in yet
    pub fn is_blank(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Check whether `candidate` is exactly one token
#[inline]
pub fn is_token(candidate: &str) -> bool {
    // Cheapest rejection first: every token is at least `{{|}}`
    if candidate.len() < OPEN.len() + CLOSE.len() + 1 {
        return false;
    }
    TOKEN_REGEX.is_match(candidate)
}

/// Extract both fields of a token, or `None` if `candidate` is not a token
pub fn parse_fields(candidate: &str) -> Option<TokenFields> {
    let caps = TOKEN_REGEX.captures(candidate)?;
    Some(TokenFields {
        left: caps.get(1).map_or("", |m| m.as_str()).to_string(),
        right: caps.get(2).map_or("", |m| m.as_str()).to_string(),
    })
}

/// Quick check used before running the matcher: text that has no separator
/// cannot contain a token
#[inline]
pub fn may_contain_token(text: &str) -> bool {
    text.contains(SEPARATOR)
}
