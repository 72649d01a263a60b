//! Library for contextual copying from Markdown documents.
//!
//! Given a document and a cursor, the crate works out which Markdown
//! construct surrounds the cursor and produces the text worth copying for it:
//! the payload of an inline span, a link to a heading or block, or the text of
//! a callout. Blocks without an identifier can be given one on the fly.
//!
//! The host application supplies the document, clipboard, notifications and
//! identifier prompt through the traits in [`host`]; [`copy`] exposes the
//! operations it wires to its commands.

#[macro_use]
mod macros;

pub mod abbreviate;
pub mod block;
pub mod block_id;
pub mod callout;
pub mod classify;
pub mod copy;
pub mod host;
pub mod io;
pub mod link;
pub mod offsets;
pub mod settings;
pub mod span;
pub mod synth;

pub use classify::{Classification, Context, ContextType, classify};
pub use copy::{
    CopyOutcome, Host, classify_and_copy, copy_document_self_link, copy_heading_or_note_link,
    generate_and_copy_block_link,
};
pub use host::{Clipboard, Cursor, Document, IdentifierPrompt, LineSource, NoticeKey, Notifier};
pub use settings::{LinkFormat, Settings, SettingsError};
