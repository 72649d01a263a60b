//! Display text for block references.
//!
//! A block link is labelled with a short excerpt of the block's first line.
//! Latin-script text keeps its first few words. Other text keeps a few
//! characters, cut early at a natural break when one comes soon enough.

use std::sync::LazyLock;

use regex::Regex;

/// Appended when text is cut at the character limit.
pub const ELLIPSIS: &str = "...";

/// Natural breaks shorter than this are ignored in favour of the character limit.
const MIN_BREAK_CHARS: usize = 3;

const BREAK_CHARS: [char; 10] = [',', '.', '-', '，', '。', '？', '！', '…', '：', '、'];

static ID_MARKER_RE: LazyLock<Regex> = lazy_regex!(
    r"(?:^|\s)\^[A-Za-z0-9_-]+",
    "block id marker pattern should compile",
);

static LINE_PREFIX_RE: LazyLock<Regex> = lazy_regex!(
    r"^\s*(?:>\s*)*(?:\[![^\]]+\][+-]?\s*)?(?:#+\s+)?(?:(?:[-*+]|\d+[.)])\s+)?(?:\[[ xX]\]\s+)?",
    "block line prefix pattern should compile",
);

static EMPHASIS_RE: LazyLock<Regex> =
    lazy_regex!(r"\*\*|__|==|~~|[*_`$]|\[\[|\]\]", "emphasis pattern should compile");

/// Reduce a block's first line to plain label text.
///
/// Drops the `^id` marker with everything after it, quote, callout, heading,
/// list and checkbox markers, and inline emphasis punctuation.
///
/// # Examples
///
/// ```
/// use mdcopy::abbreviate::block_label;
///
/// assert_eq!(block_label("- [ ] **Buy** milk ^todo"), "Buy milk");
/// ```
#[must_use]
pub fn block_label(line: &str) -> String {
    let line = ID_MARKER_RE
        .find(line)
        .map_or(line, |m| &line[..m.start()]);
    let body = LINE_PREFIX_RE.replace(line, "");
    EMPHASIS_RE.replace_all(&body, "").trim().to_string()
}

/// Whether `text` only uses ASCII letters, digits, spaces and punctuation.
#[must_use]
pub fn is_latin_like(text: &str) -> bool {
    text.chars().all(|c| {
        c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || c.is_ascii_punctuation()
    })
}

/// Shorten `label` for use as link display text.
///
/// # Examples
///
/// ```
/// use mdcopy::abbreviate::abbreviate;
///
/// assert_eq!(abbreviate("alpha beta gamma delta", 3, 5), "alpha beta gamma");
/// assert_eq!(abbreviate("这是一个很长的句子", 3, 5), "这是一个很...");
/// ```
#[must_use]
pub fn abbreviate(label: &str, word_limit: usize, char_limit: usize) -> String {
    if is_latin_like(label) {
        return label
            .split_whitespace()
            .take(word_limit)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let chars: Vec<char> = label.chars().collect();
    let natural_break = chars
        .iter()
        .position(|c| c.is_whitespace() || BREAK_CHARS.contains(c));
    if let Some(at) = natural_break
        && at < char_limit
        && at >= MIN_BREAK_CHARS
    {
        return chars[..at].iter().collect();
    }
    if chars.len() > char_limit {
        let mut cut: String = chars[..char_limit].iter().collect();
        cut.push_str(ELLIPSIS);
        return cut;
    }
    label.to_string()
}
