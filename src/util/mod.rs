//! Utility modules

pub mod text;

pub use text::{char_slice, char_to_byte, remove_char, split_at_chars};
