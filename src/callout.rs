//! Collection of callout and blockquote text around the cursor.
//!
//! Adjacent `>` lines form one callout. Each line loses one quote marker and
//! any `[!type]` header, so nested quotes flatten into plain joined text.

use std::sync::LazyLock;

use regex::Regex;

use crate::host::LineSource;

static CALLOUT_HEADER_RE: LazyLock<Regex> = lazy_regex!(
    r"^\[![^\]\s]+\][+-]?\s*",
    "callout header pattern should compile",
);

fn is_quote(line: &str) -> bool {
    line.trim().starts_with('>')
}

/// Strip one quote marker and the callout type header from `line`.
///
/// # Examples
///
/// ```
/// use mdcopy::callout::clean_line;
///
/// assert_eq!(clean_line("> [!note] Title"), "Title");
/// assert_eq!(clean_line(">> nested"), "> nested");
/// ```
#[must_use]
pub fn clean_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let body = trimmed
        .strip_prefix("> ")
        .or_else(|| trimmed.strip_prefix('>'))
        .unwrap_or(trimmed);
    CALLOUT_HEADER_RE.replace(body, "").trim().to_string()
}

/// Collect the callout containing `cursor_line`.
///
/// Returns `None` when the cursor line is not quoted.
#[must_use]
pub fn detect_callout<L: LineSource + ?Sized>(lines: &L, cursor_line: usize) -> Option<String> {
    if cursor_line >= lines.line_count() || !is_quote(lines.line(cursor_line)) {
        return None;
    }
    let mut start = cursor_line;
    while start > 0 && is_quote(lines.line(start - 1)) {
        start -= 1;
    }
    let mut end = cursor_line;
    while end + 1 < lines.line_count() && is_quote(lines.line(end + 1)) {
        end += 1;
    }
    let cleaned: Vec<String> = (start..=end).map(|i| clean_line(lines.line(i))).collect();
    Some(cleaned.join("\n"))
}
