//! UTF-8 Safe String Utilities
//!
//! Fingerprints carry *character* offsets (the rendered view counts
//! characters, not bytes), regex matches over document text yield *byte*
//! offsets, and host viewport ranges are arbitrary byte positions that can
//! land mid-character. These helpers convert byte offsets to character
//! offsets and keep any slicing on valid UTF-8 character boundaries, so
//! text containing characters like `ø`, `中`, or `🎉` never panics the
//! scan or patch paths.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk backwards to find the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// A byte is a char start if it's NOT a continuation byte (10xxxxxx).
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe Slicing Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Safely slice a string from `start` to `end`, adjusting both indices
/// down to valid UTF-8 character boundaries.
///
/// If `start >= end` after adjustment, returns an empty string.
#[inline]
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = floor_char_boundary(s, end);

    if start >= end {
        return "";
    }

    &s[start..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a byte index to a character index.
///
/// Returns the number of characters before the given byte index.
/// If the byte index is in the middle of a character, it counts
/// up to (but not including) that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // floor_char_boundary Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_floor_ascii() {
        let s = "Hello";
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 2), 2);
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 10), 5); // Beyond end
    }

    #[test]
    fn test_floor_multibyte() {
        let s = "på"; // 'å' at byte 1-2 (2 bytes)
        assert_eq!(floor_char_boundary(s, 1), 1); // Start of 'å'
        assert_eq!(floor_char_boundary(s, 2), 1); // Middle of 'å', floors to 1
    }

    #[test]
    fn test_floor_emoji() {
        let s = "Hi🎉!"; // 🎉 is 4 bytes
        assert_eq!(floor_char_boundary(s, 2), 2); // Start of 🎉
        assert_eq!(floor_char_boundary(s, 3), 2); // Middle of 🎉
        assert_eq!(floor_char_boundary(s, 6), 6); // '!'
    }

    // ─────────────────────────────────────────────────────────────────────────
    // safe_slice Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_safe_slice_ascii() {
        let s = "Hello World";
        assert_eq!(safe_slice(s, 0, 5), "Hello");
        assert_eq!(safe_slice(s, 6, 11), "World");
        assert_eq!(safe_slice(s, 0, 100), "Hello World");
    }

    #[test]
    fn test_safe_slice_chinese() {
        let s = "你好世界";
        assert_eq!(safe_slice(s, 0, 3), "你");
        assert_eq!(safe_slice(s, 3, 6), "好");
    }

    #[test]
    fn test_safe_slice_empty() {
        let s = "Hello";
        assert_eq!(safe_slice(s, 5, 5), "");
        assert_eq!(safe_slice(s, 3, 2), ""); // start > end
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Index Conversion Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_byte_to_char_index() {
        let s = "Hei på";
        assert_eq!(byte_index_to_char_index(s, 0), 0);
        assert_eq!(byte_index_to_char_index(s, 5), 5);
        assert_eq!(byte_index_to_char_index(s, 6), 5); // Middle of 'å', counts up to start
        assert_eq!(byte_index_to_char_index(s, 7), 6);
    }

    #[test]
    fn test_byte_to_char_on_checkbox_cell() {
        let s = "[x] Kjøp melk [ ] Brød";
        for (char_idx, (byte_idx, _)) in s.char_indices().enumerate() {
            assert_eq!(byte_index_to_char_index(s, byte_idx), char_idx);
        }
    }
}
