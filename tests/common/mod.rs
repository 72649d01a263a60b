//! Utility helpers shared across integration tests.

use mdcopy::{
    CopyOutcome, Cursor, Host, IdentifierPrompt, NoticeKey, Notifier,
    io::{BufferClipboard, MarkdownFile},
};

/// Build a `Vec<String>` from a list of string slices.
///
/// This macro is primarily used in tests to reduce boilerplate when
/// constructing example documents.
macro_rules! lines_vec {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

/// Records every notice instead of showing it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<NoticeKey>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: NoticeKey) {
        self.notices.push(notice);
    }
}

/// Answers the identifier prompt with a fixed reply and counts the calls.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answer: Option<String>,
    pub calls: usize,
}

impl IdentifierPrompt for ScriptedPrompt {
    fn prompt(&mut self, _title: &str, _description: &str) -> Option<String> {
        self.calls += 1;
        self.answer.clone()
    }
}

/// An in-memory document with recording collaborators.
pub struct Harness {
    pub document: MarkdownFile,
    pub clipboard: BufferClipboard,
    pub notifier: RecordingNotifier,
    pub prompt: ScriptedPrompt,
}

impl Harness {
    pub fn new(base_name: &str, text: &str, cursor: Cursor) -> Self {
        Self {
            document: MarkdownFile::from_text(base_name, text, cursor),
            clipboard: BufferClipboard::default(),
            notifier: RecordingNotifier::default(),
            prompt: ScriptedPrompt::default(),
        }
    }

    pub fn answering(mut self, answer: Option<&str>) -> Self {
        self.prompt.answer = answer.map(str::to_string);
        self
    }

    /// Run an operation against the harness document.
    pub fn run(&mut self, op: impl FnOnce(&mut Host<'_>) -> CopyOutcome) -> CopyOutcome {
        let mut host = Host {
            document: Some(&mut self.document),
            clipboard: &mut self.clipboard,
            notifier: &mut self.notifier,
            prompt: &mut self.prompt,
        };
        op(&mut host)
    }

    /// Run an operation with no active document.
    pub fn run_without_document(
        &mut self,
        op: impl FnOnce(&mut Host<'_>) -> CopyOutcome,
    ) -> CopyOutcome {
        let mut host = Host {
            document: None,
            clipboard: &mut self.clipboard,
            notifier: &mut self.notifier,
            prompt: &mut self.prompt,
        };
        op(&mut host)
    }

    pub fn copied(&self) -> Option<&str> {
        self.clipboard.text()
    }
}
