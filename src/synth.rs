//! Conversion of a classification into clipboard text.
//!
//! Inline spans copy their payload verbatim. Headings and blocks become links
//! to the current note in the configured [`LinkFormat`].

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;

use crate::{
    abbreviate::{abbreviate, block_label},
    classify::{Classification, Context},
    host::NoticeKey,
    link::LinkPart,
    settings::{LinkFormat, Settings},
    span::Construct,
};

static BLANK_RUN_RE: LazyLock<Regex> =
    lazy_regex!(r"\n{2,}", "newline run pattern should compile");

static WIKI_WRAPPER_RE: LazyLock<Regex> = lazy_regex!(
    r"^!?\[\[(?P<target>[^\[\]|]+)(?:\|[^\[\]]*)?\]\]$",
    "wiki wrapper pattern should compile",
);

/// Text to place on the clipboard and the notice announcing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Copied {
    pub text: String,
    pub notice: NoticeKey,
}

impl Copied {
    fn new(text: impl Into<String>, notice: NoticeKey) -> Self {
        Self {
            text: text.into(),
            notice,
        }
    }
}

/// How the current note is named in links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteName<'a> {
    /// File name without extension; always the link target.
    pub base: &'a str,
    /// Display name: the base name or a configured document property.
    pub title: &'a str,
}

impl<'a> NoteName<'a> {
    /// Resolve the display name from document properties when configured.
    ///
    /// A missing or blank property falls back to the base name.
    #[must_use]
    pub fn resolve(
        base: &'a str,
        properties: Option<&'a BTreeMap<String, String>>,
        settings: &Settings,
    ) -> Self {
        let title = properties
            .filter(|_| settings.use_frontmatter_as_display)
            .and_then(|props| props.get(&settings.frontmatter_key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(base);
        Self { base, title }
    }
}

fn format_link(target: &str, display: Option<&str>, format: LinkFormat) -> String {
    match format {
        LinkFormat::WikiLink => match display {
            Some(display) if display != target => format!("[[{target}|{display}]]"),
            _ => format!("[[{target}]]"),
        },
        LinkFormat::MarkdownLink => format!("[{}]({target})", display.unwrap_or_default()),
    }
}

fn same_name(heading: &str, base: &str) -> bool {
    let heading = heading.to_lowercase();
    let base = base.to_lowercase();
    let compact: String = base.chars().filter(|c| !c.is_whitespace()).collect();
    heading == base || heading == compact
}

/// Unwrap a heading that is itself a `[[wiki link]]` to its target.
fn unwrap_self_link(heading: &str) -> &str {
    WIKI_WRAPPER_RE
        .captures(heading)
        .and_then(|caps| caps.name("target"))
        .map_or(heading, |m| m.as_str().trim())
}

/// Build a link to `heading` in the current note.
///
/// A heading named like the note collapses into a plain note link, reported
/// with [`NoticeKey::NoteLinkCopied`].
///
/// # Examples
///
/// ```
/// use mdcopy::{settings::Settings, synth::{NoteName, heading_link}};
///
/// let note = NoteName { base: "Foo", title: "Foo" };
/// let settings = Settings::default();
/// assert_eq!(heading_link("Bar", &note, &settings).text, "[[Foo#Bar|Bar]]");
/// assert_eq!(heading_link("Foo", &note, &settings).text, "[[Foo]]");
/// ```
#[must_use]
pub fn heading_link(heading: &str, note: &NoteName<'_>, settings: &Settings) -> Copied {
    let heading = unwrap_self_link(heading.trim());
    let note_link = same_name(heading, note.base);
    let target = if note_link {
        note.base.to_string()
    } else {
        format!("{}#{heading}", note.base)
    };
    let display = if settings.use_heading_as_display_text {
        heading.to_string()
    } else if note_link {
        note.title.to_string()
    } else {
        format!("{}{}{heading}", note.title, settings.heading_separator)
    };
    let notice = if note_link {
        NoticeKey::NoteLinkCopied
    } else {
        NoticeKey::HeadingCopied
    };
    Copied::new(
        format_link(&target, Some(&display), settings.link_format),
        notice,
    )
}

/// How a block link is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLabel<'a> {
    /// Abbreviate the block's first line.
    Abbreviated(&'a str),
    /// Use the identifier itself.
    Identifier,
}

/// Build a link to block `id` in the current note.
///
/// Without automatic display text the link carries none: a bare wiki link, or
/// a Markdown link with an empty title.
///
/// # Examples
///
/// ```
/// use mdcopy::{settings::Settings, synth::{BlockLabel, NoteName, block_link}};
///
/// let note = NoteName { base: "Note", title: "Note" };
/// let label = BlockLabel::Abbreviated("alpha beta gamma delta ^x1");
/// assert_eq!(
///     block_link("x1", &note, label, &Settings::default()),
///     "[[Note#^x1|alpha beta gamma]]"
/// );
/// ```
#[must_use]
pub fn block_link(id: &str, note: &NoteName<'_>, label: BlockLabel<'_>, settings: &Settings) -> String {
    let target = format!("{}#^{id}", note.base);
    let display = if settings.auto_block_display_text {
        match label {
            BlockLabel::Abbreviated(line) => Some(block_label(line))
                .filter(|text| !text.is_empty())
                .map(|text| {
                    abbreviate(
                        &text,
                        settings.block_display_word_limit,
                        settings.block_display_char_limit,
                    )
                }),
            BlockLabel::Identifier => Some(id.to_string()),
        }
    } else {
        None
    };
    let link = format_link(&target, display.as_deref(), settings.link_format);
    if settings.auto_embed_block_link {
        format!("!{link}")
    } else {
        link
    }
}

/// Build a link to the current note itself.
#[must_use]
pub fn self_link(note: &NoteName<'_>, settings: &Settings) -> Copied {
    Copied::new(
        format_link(note.base, Some(note.title), settings.link_format),
        NoticeKey::FileLinkCopied,
    )
}

fn inline_notice(construct: Construct) -> NoticeKey {
    match construct {
        Construct::Bold => NoticeKey::BoldCopied,
        Construct::Italic => NoticeKey::ItalicCopied,
        Construct::Highlight => NoticeKey::HighlightCopied,
        Construct::Strikethrough => NoticeKey::StrikethroughCopied,
        Construct::InlineCode => NoticeKey::InlineCodeCopied,
        Construct::InlineLatex => NoticeKey::InlineLatexCopied,
        Construct::WikiLink => NoticeKey::WikiLinkCopied,
    }
}

fn wiki_text(content: &str, keep_brackets: bool) -> String {
    if keep_brackets {
        format!("[[{content}]]")
    } else {
        content.split('|').next().unwrap_or(content).to_string()
    }
}

fn callout_text(content: &str) -> String {
    BLANK_RUN_RE.replace_all(content, "\n").trim_end().to_string()
}

/// Produce clipboard text for a classification. `Null` yields nothing.
#[must_use]
pub fn synthesize(result: &Classification, note: &NoteName<'_>, settings: &Settings) -> Option<Copied> {
    let copied = match &result.context {
        Context::Null => return None,
        Context::Inline {
            construct: Construct::WikiLink,
            content,
            ..
        } => Copied::new(
            wiki_text(content, settings.keep_wiki_brackets),
            NoticeKey::WikiLinkCopied,
        ),
        Context::Inline {
            construct, content, ..
        } => Copied::new(content.as_str(), inline_notice(*construct)),
        Context::Link { part, content, .. } => {
            let notice = match part {
                LinkPart::Title => NoticeKey::LinkTextCopied,
                LinkPart::Url => NoticeKey::LinkUrlCopied,
            };
            Copied::new(content.as_str(), notice)
        }
        Context::Callout { content } => Copied::new(callout_text(content), NoticeKey::CalloutCopied),
        Context::Heading { text } => heading_link(text, note, settings),
        Context::BlockId { id, label_line, .. } => Copied::new(
            block_link(id, note, BlockLabel::Abbreviated(label_line), settings),
            NoticeKey::BlockIdCopied,
        ),
    };
    Some(copied)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::classify::Span;

    const NOTE: NoteName<'static> = NoteName {
        base: "Note",
        title: "Note",
    };

    fn markdown() -> Settings {
        Settings {
            link_format: LinkFormat::MarkdownLink,
            ..Settings::default()
        }
    }

    #[rstest]
    #[case(true, "[[Foo#Bar|Bar]]")]
    #[case(false, "[[Foo#Bar]]")]
    fn wiki_heading_links(#[case] heading_display: bool, #[case] expected: &str) {
        let settings = Settings {
            use_heading_as_display_text: heading_display,
            ..Settings::default()
        };
        let note = NoteName {
            base: "Foo",
            title: "Foo",
        };
        let copied = heading_link("Bar", &note, &settings);
        assert_eq!(copied.text, expected);
        assert_eq!(copied.notice, NoticeKey::HeadingCopied);
    }

    #[test]
    fn markdown_heading_link_always_has_a_title() {
        let settings = Settings {
            use_heading_as_display_text: false,
            ..markdown()
        };
        let copied = heading_link("Section Title", &NOTE, &settings);
        assert_eq!(copied.text, "[Note#Section Title](Note#Section Title)");
    }

    #[test]
    fn custom_separator_only_changes_display_text() {
        let settings = Settings {
            use_heading_as_display_text: false,
            heading_separator: " > ".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            heading_link("Part", &NOTE, &settings).text,
            "[[Note#Part|Note > Part]]"
        );
    }

    #[rstest]
    #[case("Note")]
    #[case("note")]
    #[case("[[Note]]")]
    fn heading_named_like_note_collapses(#[case] heading: &str) {
        let settings = Settings {
            use_heading_as_display_text: false,
            ..Settings::default()
        };
        let copied = heading_link(heading, &NOTE, &settings);
        assert_eq!(copied.text, "[[Note]]");
        assert_eq!(copied.notice, NoticeKey::NoteLinkCopied);
    }

    #[test]
    fn heading_matches_note_name_without_spaces() {
        let note = NoteName {
            base: "My Note",
            title: "My Note",
        };
        let copied = heading_link("MyNote", &note, &Settings::default());
        assert_eq!(copied.notice, NoticeKey::NoteLinkCopied);
        assert_eq!(copied.text, "[[My Note|MyNote]]");
    }

    #[test]
    fn property_title_replaces_display_name() {
        let props = BTreeMap::from([("title".to_string(), "Pretty Title".to_string())]);
        let settings = Settings {
            use_frontmatter_as_display: true,
            use_heading_as_display_text: false,
            ..Settings::default()
        };
        let note = NoteName::resolve("raw-name", Some(&props), &settings);
        assert_eq!(note.title, "Pretty Title");
        assert_eq!(
            heading_link("Intro", &note, &settings).text,
            "[[raw-name#Intro|Pretty Title#Intro]]"
        );
        assert_eq!(self_link(&note, &settings).text, "[[raw-name|Pretty Title]]");
    }

    #[test]
    fn blank_property_falls_back_to_base_name() {
        let props = BTreeMap::from([("title".to_string(), "  ".to_string())]);
        let settings = Settings {
            use_frontmatter_as_display: true,
            ..Settings::default()
        };
        assert_eq!(NoteName::resolve("base", Some(&props), &settings).title, "base");
        assert_eq!(NoteName::resolve("base", None, &settings).title, "base");
    }

    #[rstest]
    #[case(Settings::default(), "[[Note#^abc|some block text]]")]
    #[case(Settings { auto_block_display_text: false, ..Settings::default() }, "[[Note#^abc]]")]
    #[case(Settings { auto_block_display_text: false, ..markdown() }, "[](Note#^abc)")]
    #[case(markdown(), "[some block text](Note#^abc)")]
    #[case(Settings { auto_embed_block_link: true, ..Settings::default() }, "![[Note#^abc|some block text]]")]
    fn block_links(#[case] settings: Settings, #[case] expected: &str) {
        let label = BlockLabel::Abbreviated("- some block text here ^abc");
        assert_eq!(block_link("abc", &NOTE, label, &settings), expected);
    }

    #[test]
    fn manual_block_link_uses_identifier_as_label() {
        assert_eq!(
            block_link("my-id", &NOTE, BlockLabel::Identifier, &Settings::default()),
            "[[Note#^my-id|my-id]]"
        );
    }

    #[test]
    fn empty_label_omits_display_text() {
        let label = BlockLabel::Abbreviated("^only");
        assert_eq!(
            block_link("only", &NOTE, label, &Settings::default()),
            "[[Note#^only]]"
        );
    }

    fn inline(construct: Construct, content: &str) -> Classification {
        Classification {
            context: Context::Inline {
                construct,
                content: content.to_string(),
                span: Span { start: 0, end: 0 },
            },
            source_line: String::new(),
        }
    }

    #[rstest]
    #[case(true, "[[Page|alias]]")]
    #[case(false, "Page")]
    fn wiki_links_respect_bracket_setting(#[case] keep: bool, #[case] expected: &str) {
        let settings = Settings {
            keep_wiki_brackets: keep,
            ..Settings::default()
        };
        let copied = synthesize(&inline(Construct::WikiLink, "Page|alias"), &NOTE, &settings)
            .expect("wiki link text");
        assert_eq!(copied.text, expected);
        assert_eq!(copied.notice, NoticeKey::WikiLinkCopied);
    }

    #[test]
    fn callout_text_collapses_blank_lines() {
        let result = Classification {
            context: Context::Callout {
                content: "Title\n\n\nbody  \n".to_string(),
            },
            source_line: String::new(),
        };
        let copied = synthesize(&result, &NOTE, &Settings::default()).expect("callout text");
        assert_eq!(copied.text, "Title\nbody");
    }

    #[test]
    fn null_produces_nothing() {
        let result = Classification {
            context: Context::Null,
            source_line: String::new(),
        };
        assert_eq!(synthesize(&result, &NOTE, &Settings::default()), None);
    }

    #[test]
    fn inline_spans_copy_verbatim() {
        let copied = synthesize(&inline(Construct::Highlight, "marked"), &NOTE, &Settings::default())
            .expect("highlight text");
        assert_eq!(copied, Copied::new("marked", NoticeKey::HighlightCopied));
    }
}
