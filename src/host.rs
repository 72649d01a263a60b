//! Interfaces to the host application.
//!
//! The core never talks to an editor, clipboard or notification system
//! directly. Hosts implement these traits and hand them to the operations in
//! [`crate::copy`].

use std::{collections::BTreeMap, fmt};

/// A position in a document. `column` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Read access to the lines of a document.
pub trait LineSource {
    /// The text of line `index`, or an empty string past the end.
    fn line(&self, index: usize) -> &str;

    fn line_count(&self) -> usize;
}

impl LineSource for [String] {
    fn line(&self, index: usize) -> &str {
        self.get(index).map_or("", String::as_str)
    }

    fn line_count(&self) -> usize {
        self.len()
    }
}

impl LineSource for Vec<String> {
    fn line(&self, index: usize) -> &str {
        self.as_slice().line(index)
    }

    fn line_count(&self) -> usize {
        self.len()
    }
}

/// The document being edited.
pub trait Document: LineSource {
    fn cursor(&self) -> Cursor;

    /// Insert `text` at `at`. Embedded newlines split the line.
    fn replace_range(&mut self, text: &str, at: Cursor);

    /// File name without directory or extension.
    fn base_name(&self) -> &str;

    /// Named document properties, if the document has any.
    fn properties(&self) -> Option<&BTreeMap<String, String>> {
        None
    }
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}

pub trait Notifier {
    fn notify(&mut self, notice: NoticeKey);
}

/// Asks the user for a block identifier.
///
/// Returns `None` when the user cancels. Implementations validate the input
/// with [`crate::block_id::normalize_manual_id`] and re-prompt on failure, so a
/// returned value is always a valid identifier.
pub trait IdentifierPrompt {
    fn prompt(&mut self, title: &str, description: &str) -> Option<String>;
}

/// Localisation keys for user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKey {
    NoFile,
    NoContent,
    InlineCodeCopied,
    BlockIdCopied,
    NoteLinkCopied,
    HeadingCopied,
    BoldCopied,
    HighlightCopied,
    ItalicCopied,
    InlineLatexCopied,
    StrikethroughCopied,
    LinkTextCopied,
    LinkUrlCopied,
    WikiLinkCopied,
    CalloutCopied,
    FileLinkCopied,
}

impl NoticeKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoFile => "no-file",
            Self::NoContent => "no-content",
            Self::InlineCodeCopied => "inline-code-copied",
            Self::BlockIdCopied => "block-id-copied",
            Self::NoteLinkCopied => "note-link-copied",
            Self::HeadingCopied => "heading-copied",
            Self::BoldCopied => "bold-copied",
            Self::HighlightCopied => "highlight-copied",
            Self::ItalicCopied => "italic-copied",
            Self::InlineLatexCopied => "inline-latex-copied",
            Self::StrikethroughCopied => "strikethrough-copied",
            Self::LinkTextCopied => "link-text-copied",
            Self::LinkUrlCopied => "link-url-copied",
            Self::WikiLinkCopied => "wiki-link-copied",
            Self::CalloutCopied => "callout-copied",
            Self::FileLinkCopied => "file-link-copied",
        }
    }

    /// English fallback text.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NoFile => "Cannot get current file",
            Self::NoContent => "No content to copy at current cursor position",
            Self::InlineCodeCopied => "Inline code copied!",
            Self::BlockIdCopied => "Block ID link copied!",
            Self::NoteLinkCopied => "Note link copied!",
            Self::HeadingCopied => "Heading link copied!",
            Self::BoldCopied => "Bold text copied!",
            Self::HighlightCopied => "Highlighted text copied!",
            Self::ItalicCopied => "Italic text copied!",
            Self::InlineLatexCopied => "Inline LaTeX copied!",
            Self::StrikethroughCopied => "Strikethrough text copied!",
            Self::LinkTextCopied => "Link text copied!",
            Self::LinkUrlCopied => "Link URL copied!",
            Self::WikiLinkCopied => "Wiki link copied!",
            Self::CalloutCopied => "Callout copied!",
            Self::FileLinkCopied => "Current file link copied!",
        }
    }
}

impl fmt::Display for NoticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
