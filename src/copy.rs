//! Copy operations exposed to the host's commands and menus.
//!
//! Each operation runs one complete cycle: read the document, classify or
//! locate the target, synthesise the text, write it to the clipboard and
//! announce it. The manual identifier prompt is the only point where a cycle
//! waits on the user, and cancelling it leaves the document and clipboard
//! untouched apart from a `no-content` notice.

use tracing::{debug, info};

use crate::{
    block::{block_at, detect_block_id},
    block_id::{PROMPT_DESCRIPTION, PROMPT_TITLE, generate_id, plan_insertion},
    classify::{classify, heading_text},
    host::{Clipboard, Document, IdentifierPrompt, NoticeKey, Notifier},
    settings::Settings,
    synth::{BlockLabel, Copied, NoteName, block_link, heading_link, self_link, synthesize},
};

/// Collaborators supplied by the host for one operation.
pub struct Host<'a> {
    /// The active document, if there is one.
    pub document: Option<&'a mut dyn Document>,
    pub clipboard: &'a mut dyn Clipboard,
    pub notifier: &'a mut dyn Notifier,
    pub prompt: &'a mut dyn IdentifierPrompt,
}

/// Result of a copy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(Copied),
    /// Nothing to copy; the user was told so.
    Nothing(NoticeKey),
    /// The user dismissed the identifier prompt. Nothing was written, and the
    /// user was told there is nothing to copy.
    Cancelled,
}

impl Host<'_> {
    fn deliver(&mut self, copied: Copied, settings: &Settings) -> CopyOutcome {
        self.clipboard.write_text(&copied.text);
        if settings.show_notice {
            self.notifier.notify(copied.notice);
        }
        CopyOutcome::Copied(copied)
    }

    fn nothing(&mut self, notice: NoticeKey) -> CopyOutcome {
        self.notifier.notify(notice);
        CopyOutcome::Nothing(notice)
    }
}

/// Copy whatever the cursor points at.
///
/// When nothing is found and automatic block identifiers are enabled, the
/// enclosing block gets an identifier and its link is copied instead.
pub fn classify_and_copy(host: &mut Host<'_>, settings: &Settings) -> CopyOutcome {
    let Some(document) = host.document.as_deref() else {
        return host.nothing(NoticeKey::NoFile);
    };
    let result = classify(document, document.cursor(), settings);
    let note = NoteName::resolve(document.base_name(), document.properties(), settings);
    match synthesize(&result, &note, settings) {
        Some(copied) => host.deliver(copied, settings),
        None if settings.auto_add_block_id => {
            generate_and_copy_block_link(host, settings, settings.allow_manual_block_id)
        }
        None => host.nothing(NoticeKey::NoContent),
    }
}

/// Copy a link to the heading at or above the cursor, or to the note itself
/// when no heading precedes the cursor.
pub fn copy_heading_or_note_link(host: &mut Host<'_>, settings: &Settings) -> CopyOutcome {
    let Some(document) = host.document.as_deref() else {
        return host.nothing(NoticeKey::NoFile);
    };
    let cursor_line = document.cursor().line;
    let heading = (0..=cursor_line)
        .rev()
        .find_map(|i| heading_text(document.line(i)));
    let note = NoteName::resolve(document.base_name(), document.properties(), settings);
    let copied = match heading {
        Some(text) => heading_link(&text, &note, settings),
        None => self_link(&note, settings),
    };
    host.deliver(copied, settings)
}

/// Copy a link to the note itself.
pub fn copy_document_self_link(host: &mut Host<'_>, settings: &Settings) -> CopyOutcome {
    let Some(document) = host.document.as_deref() else {
        return host.nothing(NoticeKey::NoFile);
    };
    let note = NoteName::resolve(document.base_name(), document.properties(), settings);
    let copied = self_link(&note, settings);
    host.deliver(copied, settings)
}

/// Copy a link to the block around the cursor, giving it an identifier first
/// if it has none.
///
/// With `manual` set the identifier comes from the host prompt and labels the
/// link verbatim; otherwise a random identifier is generated and the link is
/// labelled with an abbreviation of the block's text. Dismissing the prompt
/// leaves the document and clipboard untouched and reports `no-content`.
pub fn generate_and_copy_block_link(
    host: &mut Host<'_>,
    settings: &Settings,
    manual: bool,
) -> CopyOutcome {
    let Some(document) = host.document.as_deref() else {
        return host.nothing(NoticeKey::NoFile);
    };
    let Some(range) = block_at(document, document.cursor().line) else {
        return host.nothing(NoticeKey::NoContent);
    };

    if let Some(found) = detect_block_id(document, range) {
        debug!(id = %found.id, "block already has an id");
        let note = NoteName::resolve(document.base_name(), document.properties(), settings);
        let label = BlockLabel::Abbreviated(document.line(range.start));
        let text = block_link(&found.id, &note, label, settings);
        return host.deliver(Copied { text, notice: NoticeKey::BlockIdCopied }, settings);
    }

    let id = if manual {
        match host.prompt.prompt(PROMPT_TITLE, PROMPT_DESCRIPTION) {
            Some(id) => id,
            None => {
                debug!("block id prompt cancelled");
                host.notifier.notify(NoticeKey::NoContent);
                return CopyOutcome::Cancelled;
            }
        }
    } else {
        generate_id()
    };

    let Some(document) = host.document.as_deref_mut() else {
        return host.nothing(NoticeKey::NoFile);
    };
    if let Some(insertion) = plan_insertion(&*document, range, &id) {
        document.replace_range(&insertion.text, insertion.at);
        info!(id = %id, line = insertion.at.line, "inserted block id");
    }

    let note = NoteName::resolve(document.base_name(), document.properties(), settings);
    let label = if manual {
        BlockLabel::Identifier
    } else {
        BlockLabel::Abbreviated(document.line(range.start))
    };
    let text = block_link(&id, &note, label, settings);
    host.deliver(Copied { text, notice: NoticeKey::BlockIdCopied }, settings)
}
