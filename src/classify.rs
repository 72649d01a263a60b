//! Classification of the Markdown construct under the cursor.
//!
//! Detectors run in a fixed order and the first hit wins: inline spans in
//! [`Construct::PRIORITY`] order, then Markdown links, then block identifiers,
//! then callouts, and finally headings. Inline spans come first because a
//! line-level or block-level construct contains the cursor merely by virtue
//! of the line qualifying.

use tracing::debug;

use crate::{
    block::{self, BlockRange},
    callout::detect_callout,
    host::{Cursor, LineSource},
    link::{self, LinkPart},
    offsets::{split_at_column, utf16_column},
    settings::Settings,
    span::{Construct, match_span, pattern},
};

/// Tag of a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextType {
    Null,
    Heading,
    InlineCode,
    Bold,
    Italic,
    Highlight,
    Strikethrough,
    BlockId,
    InlineLatex,
    LinkTitle,
    LinkUrl,
    WikiLink,
    Callout,
}

impl From<Construct> for ContextType {
    fn from(construct: Construct) -> Self {
        match construct {
            Construct::Bold => Self::Bold,
            Construct::Italic => Self::Italic,
            Construct::Highlight => Self::Highlight,
            Construct::Strikethrough => Self::Strikethrough,
            Construct::InlineCode => Self::InlineCode,
            Construct::InlineLatex => Self::InlineLatex,
            Construct::WikiLink => Self::WikiLink,
        }
    }
}

/// Column span of a match, in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    fn from_bytes(line: &str, start: usize, end: usize) -> Self {
        Self {
            start: utf16_column(line, start),
            end: utf16_column(line, end),
        }
    }
}

/// The construct found under the cursor, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    Null,
    Heading {
        text: String,
    },
    Inline {
        construct: Construct,
        content: String,
        span: Span,
    },
    Link {
        part: LinkPart,
        content: String,
        span: Span,
    },
    BlockId {
        id: String,
        range: BlockRange,
        /// First line of the block, used to derive display text.
        label_line: String,
    },
    Callout {
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub context: Context,
    pub source_line: String,
}

impl Classification {
    #[must_use]
    pub fn kind(&self) -> ContextType {
        match &self.context {
            Context::Null => ContextType::Null,
            Context::Heading { .. } => ContextType::Heading,
            Context::Inline { construct, .. } => (*construct).into(),
            Context::Link {
                part: LinkPart::Title,
                ..
            } => ContextType::LinkTitle,
            Context::Link {
                part: LinkPart::Url,
                ..
            } => ContextType::LinkUrl,
            Context::BlockId { .. } => ContextType::BlockId,
            Context::Callout { .. } => ContextType::Callout,
        }
    }

    /// The extracted payload without its delimiting syntax.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.context {
            Context::Null => None,
            Context::Heading { text } => Some(text),
            Context::Inline { content, .. }
            | Context::Link { content, .. }
            | Context::Callout { content } => Some(content),
            Context::BlockId { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match &self.context {
            Context::Inline { span, .. } | Context::Link { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Strip the `#` marker from a heading line.
#[must_use]
pub fn heading_text(line: &str) -> Option<String> {
    if !block::is_heading(line) {
        return None;
    }
    Some(line.trim_start_matches('#').trim().to_string())
}

/// Classify the construct at `cursor`.
#[must_use]
pub fn classify<L: LineSource + ?Sized>(lines: &L, cursor: Cursor, settings: &Settings) -> Classification {
    let line = lines.line(cursor.line);
    let context = detect(lines, line, cursor, settings);
    let result = Classification {
        context,
        source_line: line.to_string(),
    };
    debug!(
        line = cursor.line,
        column = cursor.column,
        kind = ?result.kind(),
        "classified cursor context"
    );
    result
}

fn detect<L: LineSource + ?Sized>(lines: &L, line: &str, cursor: Cursor, settings: &Settings) -> Context {
    let (before, after) = split_at_column(line, cursor.column);

    for construct in Construct::PRIORITY {
        if !settings.enabled(construct) {
            continue;
        }
        if let Some(found) = match_span(before, after, pattern(construct, settings.regex_flavor)) {
            return Context::Inline {
                construct,
                content: found.content,
                span: Span::from_bytes(line, found.start, found.end),
            };
        }
    }

    if settings.link_enabled()
        && let Some(found) = link::locate(before, after)
    {
        return Context::Link {
            part: found.part,
            content: found.content,
            span: Span::from_bytes(line, found.start, found.end),
        };
    }

    if let Some(range) = block::block_at(lines, cursor.line)
        && let Some(found) = block::detect_block_id(lines, range)
    {
        return Context::BlockId {
            id: found.id,
            range,
            label_line: lines.line(range.start).to_string(),
        };
    }

    if settings.enable_callout_copy
        && (!settings.auto_add_block_id || settings.callout_copy_priority)
        && let Some(content) = detect_callout(lines, cursor.line)
    {
        return Context::Callout { content };
    }

    if let Some(text) = heading_text(line) {
        return Context::Heading { text };
    }

    Context::Null
}
