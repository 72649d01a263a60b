//! Block range detection and block identifier lookup.
//!
//! A block is a run of adjacent lines of continuous text around the cursor.
//! Blank lines, headings and list items bound it, except that a list item on
//! the cursor line extends downward through its continuation lines. A leading
//! frontmatter block never merges with the body below it. The range
//! is recomputed on every call because the document may have changed since
//! the last one.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::host::LineSource;

static TRAILING_ID_RE: LazyLock<Regex> = lazy_regex!(
    r"(?:^|\s)\^(?P<id>[A-Za-z0-9_-]+)$",
    "trailing block id pattern should compile",
);

static DETACHED_ID_RE: LazyLock<Regex> = lazy_regex!(
    r"^ *\^(?P<id>[A-Za-z0-9_-]+)$",
    "detached block id pattern should compile",
);

static HEADING_RE: LazyLock<Regex> =
    lazy_regex!(r"^#+\s", "heading pattern should compile");

const FRONTMATTER_FENCE: &str = "---";

/// Inclusive line span of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: usize,
    pub end: usize,
}

/// An identifier already attached to a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundBlockId {
    pub id: String,
    /// Line carrying the `^id` marker.
    pub line: usize,
}

/// Whether `line` is an ATX heading (`#` run followed by whitespace).
#[must_use]
pub fn is_heading(line: &str) -> bool {
    HEADING_RE.is_match(line)
}

fn is_list_item(line: &str) -> bool {
    line.trim_start().starts_with("- ")
}

/// Whether `line` continues a block: non-blank, not a heading, not a list item.
#[must_use]
pub fn is_continuous_text(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with("- ")
}

/// Line index of the fence closing a leading `---` frontmatter block.
#[must_use]
pub fn frontmatter_end<L: LineSource + ?Sized>(lines: &L) -> Option<usize> {
    if lines.line_count() == 0 || lines.line(0).trim_end() != FRONTMATTER_FENCE {
        return None;
    }
    (1..lines.line_count()).find(|&i| lines.line(i).trim_end() == FRONTMATTER_FENCE)
}

/// Lines a block around `cursor_line` may span. Frontmatter is kept apart
/// from the body so its fences never join the first paragraph.
fn bounds<L: LineSource + ?Sized>(lines: &L, cursor_line: usize) -> (usize, usize) {
    let last = lines.line_count().saturating_sub(1);
    match frontmatter_end(lines) {
        Some(end) if cursor_line <= end => (0, end),
        Some(end) => (end + 1, last),
        None => (0, last),
    }
}

/// Detect the block containing `cursor_line`.
///
/// A heading line forms a block on its own. A list item starts its block and
/// extends downward only. Any other line extends in both directions.
#[must_use]
pub fn detect_range<L: LineSource + ?Sized>(lines: &L, cursor_line: usize) -> BlockRange {
    let current = lines.line(cursor_line);
    if is_heading(current) {
        return BlockRange {
            start: cursor_line,
            end: cursor_line,
        };
    }

    let (floor, ceiling) = bounds(lines, cursor_line);
    let mut start = cursor_line;
    if !is_list_item(current) {
        while start > floor && is_continuous_text(lines.line(start - 1)) {
            start -= 1;
        }
    }

    let mut end = cursor_line;
    while end < ceiling && is_continuous_text(lines.line(end + 1)) {
        end += 1;
    }

    debug!(cursor_line, start, end, "detected block range");
    BlockRange { start, end }
}

/// Detect the block nearest to `cursor_line`.
///
/// A blank cursor line anchors at the closest non-blank line above it, or
/// below it when nothing precedes. Returns `None` for a document without any
/// text.
#[must_use]
pub fn block_at<L: LineSource + ?Sized>(lines: &L, cursor_line: usize) -> Option<BlockRange> {
    let count = lines.line_count();
    if count == 0 {
        return None;
    }
    let cursor_line = cursor_line.min(count - 1);
    let (floor, ceiling) = bounds(lines, cursor_line);
    let blank = |i: usize| lines.line(i).trim().is_empty();
    let anchor = if blank(cursor_line) {
        (floor..cursor_line)
            .rev()
            .find(|&i| !blank(i))
            .or_else(|| (cursor_line + 1..=ceiling).find(|&i| !blank(i)))?
    } else {
        cursor_line
    };
    Some(detect_range(lines, anchor))
}

/// Extract the identifier from a line ending in `^id`.
#[must_use]
pub fn trailing_block_id(line: &str) -> Option<&str> {
    TRAILING_ID_RE
        .captures(line.trim_end())
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Find the identifier attached to `range`.
///
/// The block's last line is checked first. Failing that, an identifier on its
/// own line after a single blank separator also belongs to the block.
#[must_use]
pub fn detect_block_id<L: LineSource + ?Sized>(lines: &L, range: BlockRange) -> Option<FoundBlockId> {
    if let Some(id) = trailing_block_id(lines.line(range.end)) {
        debug!(id, line = range.end, "found trailing block id");
        return Some(FoundBlockId {
            id: id.to_string(),
            line: range.end,
        });
    }

    let separator = range.end + 1;
    let detached = range.end + 2;
    if detached >= lines.line_count() || !lines.line(separator).trim().is_empty() {
        return None;
    }
    let id = DETACHED_ID_RE.captures(lines.line(detached))?.name("id")?.as_str();
    debug!(id, line = detached, "found detached block id");
    Some(FoundBlockId {
        id: id.to_string(),
        line: detached,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case("plain text", true)]
    #[case("  indented", true)]
    #[case("> quoted", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("# Heading", false)]
    #[case("- item", false)]
    fn recognises_continuous_text(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_continuous_text(line), expected);
    }

    #[test]
    fn expands_paragraph_both_ways() {
        let lines = doc(&["# Title", "one", "two", "three", "", "after"]);
        assert_eq!(detect_range(&lines, 2), BlockRange { start: 1, end: 3 });
    }

    #[test]
    fn list_item_expands_downward_only() {
        let lines = doc(&["intro", "- item", "  continued", "- next"]);
        assert_eq!(detect_range(&lines, 1), BlockRange { start: 1, end: 2 });
    }

    #[test]
    fn continuation_line_stops_at_list_item() {
        let lines = doc(&["- item", "  continued", "more"]);
        assert_eq!(detect_range(&lines, 2), BlockRange { start: 1, end: 2 });
    }

    #[test]
    fn heading_is_its_own_block() {
        let lines = doc(&["## Heading", "body"]);
        assert_eq!(detect_range(&lines, 0), BlockRange { start: 0, end: 0 });
    }

    #[rstest]
    #[case(&["para", "", ""], 2, Some(BlockRange { start: 0, end: 0 }))]
    #[case(&["", "", "para"], 0, Some(BlockRange { start: 2, end: 2 }))]
    #[case(&["", " "], 1, None)]
    #[case(&["para"], 9, Some(BlockRange { start: 0, end: 0 }))]
    fn anchors_blank_lines(
        #[case] lines: &[&str],
        #[case] cursor: usize,
        #[case] expected: Option<BlockRange>,
    ) {
        assert_eq!(block_at(&doc(lines), cursor), expected);
    }

    #[rstest]
    #[case(&["---", "title: T", "---", "body text"], 3, BlockRange { start: 3, end: 3 })]
    #[case(&["---", "title: T", "---", "", "body text"], 3, BlockRange { start: 4, end: 4 })]
    #[case(&["---", "title: T", "---", "body", "more"], 4, BlockRange { start: 3, end: 4 })]
    #[case(&["---", "title: T", "---", "body"], 1, BlockRange { start: 0, end: 2 })]
    #[case(&["---", "not closed", "body"], 2, BlockRange { start: 0, end: 2 })]
    fn keeps_frontmatter_apart(
        #[case] lines: &[&str],
        #[case] cursor: usize,
        #[case] expected: BlockRange,
    ) {
        assert_eq!(block_at(&doc(lines), cursor), Some(expected));
    }

    #[rstest]
    #[case("text ^abc-1", Some("abc-1"))]
    #[case("text ^abc   ", Some("abc"))]
    #[case("^solo", Some("solo"))]
    #[case("x^abc", None)]
    #[case("text ^abc more", None)]
    #[case("text ^a.b", None)]
    fn reads_trailing_ids(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(trailing_block_id(line), expected);
    }

    #[test]
    fn finds_detached_identifier() {
        let lines = doc(&["> quote", "", "  ^quote-id", "next"]);
        let range = detect_range(&lines, 0);
        assert_eq!(
            detect_block_id(&lines, range),
            Some(FoundBlockId {
                id: "quote-id".into(),
                line: 2
            })
        );
    }

    #[rstest]
    #[case(&["para", "", "^id extra"])]
    #[case(&["para", "", "", "^id"])]
    #[case(&["para", "", "text ^id"])]
    #[case(&["para", ""])]
    fn ignores_non_detached_identifiers(#[case] lines: &[&str]) {
        let lines = doc(lines);
        let range = detect_range(&lines, 0);
        assert_eq!(detect_block_id(&lines, range), None);
    }

    #[test]
    fn detection_is_idempotent() {
        let lines = doc(&["first", "second ^keep", "", "other"]);
        let first = detect_range(&lines, 0);
        let second = detect_range(&lines, 0);
        assert_eq!(first, second);
        assert_eq!(detect_block_id(&lines, first), detect_block_id(&lines, second));
        assert_eq!(
            detect_block_id(&lines, first).map(|f| f.id),
            Some("keep".to_string())
        );
    }
}
