//! Cursor-anchored matching of inline Markdown spans.
//!
//! Each [`Construct`] owns a pattern whose first non-empty capture group is the
//! span's payload. Matching runs the pattern over the whole line and keeps the
//! first match whose extent touches the cursor. Constructs are tried one at a
//! time in [`Construct::PRIORITY`] order by the classifier, so overlapping
//! syntaxes resolve by that order rather than by proximity.
//!
//! Italic delimiters need context to tell `*x*` apart from the inside of
//! `**x**`. [`RegexFlavor::Lookaround`] expresses this with look-behind.
//! [`RegexFlavor::LookaheadOnly`] consumes the preceding character instead and
//! reports the construct's own extent through a framing group. The two agree on
//! every single-span ASCII case, but the look-ahead-only form cannot see a
//! delimiter that directly follows a previous match, so `*a*_b_` yields only
//! `a` there.

use std::sync::LazyLock;

use fancy_regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Inline constructs recognised by the span matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Bold,
    Italic,
    Highlight,
    Strikethrough,
    InlineCode,
    InlineLatex,
    WikiLink,
}

impl Construct {
    /// Matching order. Earlier entries win when several spans contain the cursor.
    pub const PRIORITY: [Self; 7] = [
        Self::Bold,
        Self::Italic,
        Self::Highlight,
        Self::Strikethrough,
        Self::InlineCode,
        Self::InlineLatex,
        Self::WikiLink,
    ];
}

/// Regex capability of the running platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegexFlavor {
    #[default]
    Lookaround,
    LookaheadOnly,
}

/// A compiled construct pattern.
pub struct SpanPattern {
    regex: Regex,
    /// Groups holding the construct's extent when the pattern consumes
    /// context outside it. Empty means the whole match is the extent.
    frames: &'static [usize],
}

impl SpanPattern {
    fn new(pattern: &str, frames: &'static [usize], msg: &str) -> Self {
        Self {
            regex: Regex::new(pattern).expect(msg),
            frames,
        }
    }

    fn extent(&self, caps: &Captures<'_>) -> Option<(usize, usize)> {
        let found = if self.frames.is_empty() {
            caps.get(0)
        } else {
            self.frames.iter().find_map(|&i| caps.get(i))
        };
        found.map(|m| (m.start(), m.end()))
    }

    fn payload(&self, caps: &Captures<'_>) -> Option<String> {
        (1..caps.len())
            .filter(|i| !self.frames.contains(i))
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// A span located around the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    pub content: String,
    /// Byte offset of the first delimiter in the matched text.
    pub start: usize,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
}

static BOLD: LazyLock<SpanPattern> = LazyLock::new(|| {
    SpanPattern::new(r"\*\*(.+?)\*\*|__(.+?)__", &[], "valid bold pattern")
});

static ITALIC_LOOKAROUND: LazyLock<SpanPattern> = LazyLock::new(|| {
    SpanPattern::new(
        r"(?<!\*)\*([^*\n]+)\*(?!\*)|(?<!\w)_([^_\n]+)_(?!\w)",
        &[],
        "valid italic pattern",
    )
});

static ITALIC_LOOKAHEAD: LazyLock<SpanPattern> = LazyLock::new(|| {
    SpanPattern::new(
        r"(?:^|[^*])(\*([^*\n]+)\*(?!\*))|(?:^|\W)(_([^_\n]+)_(?!\w))",
        &[1, 3],
        "valid look-ahead italic pattern",
    )
});

static HIGHLIGHT: LazyLock<SpanPattern> =
    LazyLock::new(|| SpanPattern::new(r"==(.+?)==", &[], "valid highlight pattern"));

static STRIKETHROUGH: LazyLock<SpanPattern> =
    LazyLock::new(|| SpanPattern::new(r"~~(.+?)~~", &[], "valid strikethrough pattern"));

static INLINE_CODE: LazyLock<SpanPattern> =
    LazyLock::new(|| SpanPattern::new(r"`([^`\n]+)`", &[], "valid inline code pattern"));

static INLINE_LATEX: LazyLock<SpanPattern> =
    LazyLock::new(|| SpanPattern::new(r"\$([^$\n]+)\$", &[], "valid inline latex pattern"));

static WIKI_LINK: LazyLock<SpanPattern> = LazyLock::new(|| {
    SpanPattern::new(r"\[\[([^\[\]\n]+)\]\]", &[], "valid wiki link pattern")
});

/// Return the pattern used for `construct` under `flavor`.
#[must_use]
pub fn pattern(construct: Construct, flavor: RegexFlavor) -> &'static SpanPattern {
    match construct {
        Construct::Bold => &BOLD,
        Construct::Italic => match flavor {
            RegexFlavor::Lookaround => &ITALIC_LOOKAROUND,
            RegexFlavor::LookaheadOnly => &ITALIC_LOOKAHEAD,
        },
        Construct::Highlight => &HIGHLIGHT,
        Construct::Strikethrough => &STRIKETHROUGH,
        Construct::InlineCode => &INLINE_CODE,
        Construct::InlineLatex => &INLINE_LATEX,
        Construct::WikiLink => &WIKI_LINK,
    }
}

/// Find the first match of `pattern` whose extent contains the cursor.
///
/// The cursor sits between `before` and `after`. A match touching the cursor
/// with either boundary counts as containing it. Offsets in the result index
/// into `before + after`.
///
/// # Examples
///
/// ```
/// use mdcopy::span::{Construct, RegexFlavor, match_span, pattern};
///
/// let bold = pattern(Construct::Bold, RegexFlavor::Lookaround);
/// let found = match_span("a **bo", "ld** b", bold).expect("bold span");
/// assert_eq!(found.content, "bold");
/// assert_eq!((found.start, found.end), (2, 10));
/// assert!(match_span("a ", "**bold** b", bold).is_some());
/// assert!(match_span("a", " **bold** b", bold).is_none());
/// ```
#[must_use]
pub fn match_span(before: &str, after: &str, pattern: &SpanPattern) -> Option<SpanMatch> {
    let text = format!("{before}{after}");
    let cursor = before.len();
    pattern
        .regex
        .captures_iter(&text)
        .map_while(Result::ok)
        .find_map(|caps| {
            let (start, end) = pattern.extent(&caps)?;
            if start > cursor || cursor > end {
                return None;
            }
            let content = pattern.payload(&caps)?;
            Some(SpanMatch {
                content,
                start,
                end,
            })
        })
}
