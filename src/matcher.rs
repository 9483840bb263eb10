//! First-token search over a run of plain text
//!
//! Text is split on single spaces and each word is checked against the token
//! grammar. Tokens never contain spaces, so a token is always a whole word.
//! Only the first token is reported; callers re-run the search after each
//! extraction to pick up the next one.

use crate::pattern::is_token;

/// A token found inside a text unit
///
/// `offset` is a character (not byte) offset into the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCandidate {
    pub offset: usize,
    pub matched_text: String,
}

impl TokenCandidate {
    /// Length of the match in characters
    pub fn len(&self) -> usize {
        self.matched_text.chars().count()
    }

    /// Always false for a candidate produced by [`find_first`]
    pub fn is_empty(&self) -> bool {
        self.matched_text.is_empty()
    }

    /// Character offset one past the end of the match
    pub fn end(&self) -> usize {
        self.offset + self.len()
    }

    /// Whether the match starts the text (needs a two-way split instead of three)
    pub fn is_leading(&self) -> bool {
        self.offset == 0
    }
}

/// Find the first token in `text`
pub fn find_first(text: &str) -> Option<TokenCandidate> {
    if text.is_empty() {
        return None;
    }

    let mut offset = 0;
    for word in text.split(' ') {
        if is_token(word) {
            return Some(TokenCandidate {
                offset,
                matched_text: word.to_string(),
            });
        }
        // Skip the word plus the single space that followed it
        offset += word.chars().count() + 1;
    }

    None
}
