//! Conversion between host columns and byte offsets.
//!
//! Hosts address a cursor column in UTF-16 code units. Regex matching works on
//! byte offsets into UTF-8 text, so every boundary crossing between the two goes
//! through this module. Columns that land inside a surrogate pair or past the
//! end of the line are clamped to the nearest preceding character boundary.

/// Convert a UTF-16 column into a byte offset within `line`.
///
/// # Examples
///
/// ```
/// use mdcopy::offsets::byte_offset;
///
/// assert_eq!(byte_offset("abc", 2), 2);
/// assert_eq!(byte_offset("é=x", 1), 2);
/// assert_eq!(byte_offset("abc", 99), 3);
/// ```
#[must_use]
pub fn byte_offset(line: &str, column: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in line.char_indices() {
        let next = units + ch.len_utf16();
        if next > column {
            return idx;
        }
        units = next;
    }
    line.len()
}

/// Convert a byte offset within `line` into a UTF-16 column.
///
/// Offsets that do not fall on a character boundary are rounded down.
#[must_use]
pub fn utf16_column(line: &str, byte: usize) -> usize {
    line.char_indices()
        .take_while(|(idx, _)| *idx < byte)
        .map(|(_, ch)| ch.len_utf16())
        .sum()
}

/// Split `line` at a UTF-16 column into the text before and after the cursor.
#[must_use]
pub fn split_at_column(line: &str, column: usize) -> (&str, &str) {
    line.split_at(byte_offset(line, column))
}
