//! Character-offset helpers for text units
//!
//! Every offset in the tree is a character offset; these convert to byte
//! positions at the point where a `String` is actually sliced.

/// Byte index of the `char_idx`-th character, clamped to the end of `text`
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Slice `text` by character range `[start, end)`
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start = char_to_byte(text, start);
    let end = char_to_byte(text, end).max(start);
    &text[start..end]
}

/// Split `text` into pieces at the given character offsets
///
/// Offsets at 0, at or past the end, and repeats are ignored, so the result
/// always has `valid offsets + 1` non-empty pieces (or one piece for empty text).
pub fn split_at_chars<'a>(text: &'a str, offsets: &[usize]) -> Vec<&'a str> {
    let len = text.chars().count();
    let mut cuts: Vec<usize> = offsets
        .iter()
        .copied()
        .filter(|&offset| offset > 0 && offset < len)
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        pieces.push(char_slice(text, start, cut));
        start = cut;
    }
    pieces.push(char_slice(text, start, len));
    pieces
}

/// Remove the character at `char_idx`, returning it
pub fn remove_char(text: &mut String, char_idx: usize) -> Option<char> {
    let (byte, _) = text.char_indices().nth(char_idx)?;
    Some(text.remove(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte_multibyte() {
        assert_eq!(char_to_byte("héllo", 0), 0);
        assert_eq!(char_to_byte("héllo", 2), 3);
        assert_eq!(char_to_byte("héllo", 5), 6);
        assert_eq!(char_to_byte("héllo", 50), 6);
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("hello {{A|B}} world", 6, 13), "{{A|B}}");
        assert_eq!(char_slice("åäö", 1, 2), "ä");
        assert_eq!(char_slice("abc", 2, 1), "");
    }

    #[test]
    fn test_split_three_ways() {
        assert_eq!(
            split_at_chars("hello {{A|B}} world", &[6, 13]),
            vec!["hello ", "{{A|B}}", " world"]
        );
    }

    #[test]
    fn test_split_ignores_boundary_offsets() {
        assert_eq!(split_at_chars("{{A|B}}", &[0, 7]), vec!["{{A|B}}"]);
        assert_eq!(split_at_chars("ab {{A|B}}", &[3, 10]), vec!["ab ", "{{A|B}}"]);
        assert_eq!(split_at_chars("abcd", &[2, 2]), vec!["ab", "cd"]);
        assert_eq!(split_at_chars("", &[1]), vec![""]);
    }

    #[test]
    fn test_remove_char() {
        let mut text = "héllo".to_string();
        assert_eq!(remove_char(&mut text, 1), Some('é'));
        assert_eq!(text, "hllo");
        assert_eq!(remove_char(&mut text, 10), None);
    }
}
