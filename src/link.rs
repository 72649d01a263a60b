//! Detection of the cursor's position inside a Markdown `[title](url)` link.

use std::sync::LazyLock;

use regex::Regex;

static LINK_RE: LazyLock<Regex> = lazy_regex!(
    r"\[(?P<title>[^\]\n]*?)\]\((?P<url>[^)\n]*?)\)",
    "link pattern should compile",
);

/// The segment of a link that holds the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPart {
    Title,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub part: LinkPart,
    pub content: String,
    /// Byte offsets of the whole link within `before + after`.
    pub start: usize,
    pub end: usize,
}

/// Locate a Markdown link around the cursor and report which part holds it.
///
/// The first link whose extent contains the cursor is split into its title
/// (between `[` and `]`) and url (between `(` and `)`) segments, both bounds
/// inclusive. A cursor on the shared `](` boundary resolves to the title. A
/// cursor on the outer brackets belongs to neither segment.
///
/// # Examples
///
/// ```
/// use mdcopy::link::{LinkPart, locate};
///
/// let found = locate("see [Do", "cs](https://example.com)").expect("link");
/// assert_eq!(found.part, LinkPart::Title);
/// assert_eq!(found.content, "Docs");
/// ```
#[must_use]
pub fn locate(before: &str, after: &str) -> Option<LinkMatch> {
    let text = format!("{before}{after}");
    let cursor = before.len();
    let caps = LINK_RE.captures_iter(&text).find(|caps| {
        caps.get(0)
            .is_some_and(|m| m.start() <= cursor && cursor <= m.end())
    })?;
    let whole = caps.get(0)?;
    let title = caps.name("title")?;
    let url = caps.name("url")?;
    let part = if title.start() <= cursor && cursor <= title.end() {
        LinkPart::Title
    } else if url.start() <= cursor && cursor <= url.end() {
        LinkPart::Url
    } else {
        return None;
    };
    let content = match part {
        LinkPart::Title => title.as_str(),
        LinkPart::Url => url.as_str(),
    };
    Some(LinkMatch {
        part,
        content: content.to_string(),
        start: whole.start(),
        end: whole.end(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const LINE: &str = "a [Rust](https://rust-lang.org) b";

    #[rstest]
    #[case(3, Some((LinkPart::Title, "Rust")))]
    #[case(7, Some((LinkPart::Title, "Rust")))]
    #[case(9, Some((LinkPart::Url, "https://rust-lang.org")))]
    #[case(30, Some((LinkPart::Url, "https://rust-lang.org")))]
    #[case(2, None)]
    #[case(31, None)]
    #[case(1, None)]
    fn classifies_cursor_segments(#[case] cursor: usize, #[case] expected: Option<(LinkPart, &str)>) {
        let (before, after) = LINE.split_at(cursor);
        let found = locate(before, after);
        assert_eq!(
            found.as_ref().map(|m| (m.part, m.content.as_str())),
            expected
        );
    }

    #[test]
    fn picks_the_link_under_the_cursor() {
        let line = "[one](1) and [two](2)";
        let (before, after) = line.split_at(15);
        let found = locate(before, after).expect("second link");
        assert_eq!(found.content, "two");
        assert_eq!((found.start, found.end), (13, 21));
    }
}
