//! File-backed host for running copy operations from the command line.
//!
//! [`MarkdownFile`] plays the editor: it holds the lines of a Markdown file,
//! the cursor, and any YAML frontmatter properties. The clipboard, notifier
//! and prompt here work over plain readers and writers.

use std::{
    collections::BTreeMap,
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    block::frontmatter_end,
    block_id::normalize_manual_id,
    host::{Clipboard, Cursor, Document, IdentifierPrompt, LineSource, NoticeKey, Notifier},
    offsets::byte_offset,
};

/// Errors raised while reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write document {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A Markdown file loaded into memory with a cursor position.
#[derive(Debug, Clone)]
pub struct MarkdownFile {
    path: PathBuf,
    base_name: String,
    lines: Vec<String>,
    trailing_newline: bool,
    cursor: Cursor,
    properties: Option<BTreeMap<String, String>>,
    modified: bool,
}

impl MarkdownFile {
    /// Read `path` and place the cursor at `cursor`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Read`] if the file cannot be read.
    pub fn open<P: AsRef<Path>>(path: P, cursor: Cursor) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut file = Self::from_text(&base_name, &text, cursor);
        file.path = path.to_path_buf();
        Ok(file)
    }

    /// Build a document from text without touching the filesystem.
    #[must_use]
    pub fn from_text(base_name: &str, text: &str, cursor: Cursor) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let properties = parse_frontmatter(&lines);
        Self {
            path: PathBuf::from(format!("{base_name}.md")),
            base_name: base_name.to_string(),
            lines,
            trailing_newline: text.ends_with('\n'),
            cursor,
            properties,
            modified: false,
        }
    }

    /// Whether an edit has been applied since loading.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The document text, keeping the original trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// Write the document back to the file it was loaded from.
    ///
    /// # Errors
    /// Returns [`DocumentError::Write`] if the file cannot be written.
    pub fn save(&self) -> Result<(), DocumentError> {
        fs::write(&self.path, self.to_text()).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl LineSource for MarkdownFile {
    fn line(&self, index: usize) -> &str {
        self.lines.line(index)
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Document for MarkdownFile {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn replace_range(&mut self, text: &str, at: Cursor) {
        if at.line >= self.lines.len() {
            self.lines.resize(at.line + 1, String::new());
        }
        let line = &self.lines[at.line];
        let split = byte_offset(line, at.column);
        let joined = format!("{}{text}{}", &line[..split], &line[split..]);
        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        self.lines.splice(at.line..=at.line, replacement);
        self.modified = true;
    }

    fn base_name(&self) -> &str {
        &self.base_name
    }

    fn properties(&self) -> Option<&BTreeMap<String, String>> {
        self.properties.as_ref()
    }
}

/// Scalar properties from a leading `---` YAML block.
///
/// Sequences and mappings are skipped. Malformed YAML is treated as having no
/// properties.
fn parse_frontmatter(lines: &[String]) -> Option<BTreeMap<String, String>> {
    let end = frontmatter_end(lines)?;
    let yaml = lines[1..end].join("\n");
    let mapping: serde_yaml::Mapping = match serde_yaml::from_str(&yaml) {
        Ok(mapping) => mapping,
        Err(err) => {
            warn!(error = %err, "ignoring malformed frontmatter");
            return None;
        }
    };
    let properties: BTreeMap<String, String> = mapping
        .iter()
        .filter_map(|(key, value)| Some((scalar(key)?, scalar(value)?)))
        .collect();
    debug!(count = properties.len(), "read frontmatter properties");
    Some(properties)
}

fn scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Clipboard that keeps the last text written to it.
#[derive(Debug, Default)]
pub struct BufferClipboard {
    text: Option<String>,
}

impl BufferClipboard {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for BufferClipboard {
    fn write_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}

/// Writes each notice's message as a line of output.
#[derive(Debug)]
pub struct StreamNotifier<W> {
    out: W,
}

impl<W: Write> StreamNotifier<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for StreamNotifier<W> {
    fn notify(&mut self, notice: NoticeKey) {
        if let Err(err) = writeln!(self.out, "{notice}") {
            warn!(error = %err, key = notice.as_str(), "failed to write notice");
        }
    }
}

/// Reads block identifiers line by line.
///
/// An empty line or end of input cancels. Rejected input is reported on the
/// output and the prompt repeats.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    #[must_use]
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }
}

impl<R: BufRead, W: Write> IdentifierPrompt for LinePrompt<R, W> {
    fn prompt(&mut self, title: &str, description: &str) -> Option<String> {
        // Prompt text is advisory; a broken output stream must not stop input.
        let _ = writeln!(self.out, "{title}\n{description}");
        loop {
            let mut entry = String::new();
            match self.input.read_line(&mut entry) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read block id");
                    return None;
                }
            }
            if entry.trim().is_empty() {
                return None;
            }
            match normalize_manual_id(&entry) {
                Ok(id) => return Some(id),
                Err(err) => {
                    warn!(key = err.key(), input = entry.trim(), "rejected block id");
                    let _ = writeln!(self.out, "{err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor as Input;

    use rstest::rstest;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn open_and_save_roundtrip() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Daily Note.md");
        fs::write(&file, "first line\nsecond line\n").unwrap();
        let mut doc = MarkdownFile::open(&file, Cursor::new(1, 0)).unwrap();
        assert_eq!(doc.base_name(), "Daily Note");
        assert_eq!(doc.line_count(), 2);
        assert!(!doc.is_modified());

        doc.replace_range(" ^abc123", Cursor::new(1, 11));
        assert!(doc.is_modified());
        doc.save().unwrap();
        let out = fs::read_to_string(&file).unwrap();
        assert_eq!(out, "first line\nsecond line ^abc123\n");
    }

    #[test]
    fn open_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = MarkdownFile::open(dir.path().join("absent.md"), Cursor::default()).unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }

    #[test]
    fn replace_range_splits_on_newlines() {
        let mut doc = MarkdownFile::from_text("n", "> quote\nafter", Cursor::default());
        doc.replace_range("\n\n^q1", Cursor::new(0, 7));
        assert_eq!(doc.lines(), ["> quote", "", "^q1", "after"]);
        assert_eq!(doc.to_text(), "> quote\n\n^q1\nafter");
    }

    #[test]
    fn replace_range_uses_utf16_columns() {
        let mut doc = MarkdownFile::from_text("n", "😀 x", Cursor::default());
        doc.replace_range("!", Cursor::new(0, 2));
        assert_eq!(doc.line(0), "😀! x");
    }

    #[rstest]
    #[case("---\ntitle: My Title\nrank: 3\ndraft: true\ntags: [a, b]\n---\nbody", Some(&[("draft", "true"), ("rank", "3"), ("title", "My Title")][..]))]
    #[case("---\ntitle: [unclosed\n---\n", None)]
    #[case("---\ntitle: open\nbody", None)]
    #[case("no frontmatter", None)]
    fn reads_frontmatter_scalars(#[case] text: &str, #[case] expected: Option<&[(&str, &str)]>) {
        let doc = MarkdownFile::from_text("n", text, Cursor::default());
        let expected: Option<BTreeMap<String, String>> = expected.map(|pairs| {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        });
        assert_eq!(doc.properties(), expected.as_ref());
    }

    #[test]
    fn notifier_writes_messages() {
        let mut notifier = StreamNotifier::new(Vec::new());
        notifier.notify(NoticeKey::BoldCopied);
        let out = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(out, "Bold text copied!\n");
    }

    #[rstest]
    #[case("my block\n", Some("my-block"))]
    #[case("bad/id\nok_id\n", Some("ok_id"))]
    #[case("\n", None)]
    #[case("", None)]
    fn prompt_validates_and_cancels(#[case] input: &str, #[case] expected: Option<&str>) {
        let mut prompt = LinePrompt::new(Input::new(input.as_bytes()), Vec::new());
        assert_eq!(prompt.prompt("Title", "Help").as_deref(), expected);
    }

    #[test]
    fn prompt_reports_rejections() {
        let mut prompt = LinePrompt::new(Input::new(&b"a/b\n"[..]), Vec::new());
        assert_eq!(prompt.prompt("Title", "Help"), None);
        let out = String::from_utf8(prompt.into_output()).unwrap();
        assert!(out.contains("Only letters, numbers, hyphens and underscores are allowed"));
    }
}
