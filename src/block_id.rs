//! Creation and placement of new block identifiers.
//!
//! Generated identifiers are short random tokens. They are not checked against
//! identifiers already present in the document, so a collision is possible,
//! though unlikely at this length.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use thiserror::Error;

use crate::{
    block::{BlockRange, trailing_block_id},
    host::{Cursor, LineSource},
    offsets::utf16_column,
};

pub const GENERATED_ID_LEN: usize = 6;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Title shown by the manual identifier prompt.
pub const PROMPT_TITLE: &str = "Enter block ID";

/// Description shown by the manual identifier prompt.
pub const PROMPT_DESCRIPTION: &str =
    "Allowed: letters, numbers, hyphens (-), underscores (_). Spaces will be converted to hyphens.";

static VALID_ID_RE: LazyLock<Regex> =
    lazy_regex!(r"^[-_A-Za-z0-9]+$", "block id charset pattern should compile");

static WHITESPACE_RE: LazyLock<Regex> =
    lazy_regex!(r"\s+", "whitespace pattern should compile");

/// Rejections for a manually entered identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockIdError {
    #[error("Block ID cannot be empty")]
    Empty,
    #[error("Only letters, numbers, hyphens and underscores are allowed")]
    Invalid,
}

impl BlockIdError {
    /// Localisation key of the error message.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Empty => "error-block-id-empty",
            Self::Invalid => "error-block-id-invalid",
        }
    }
}

/// Generate a random identifier of lowercase letters and digits.
#[must_use]
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// Validate user input as a block identifier.
///
/// Surrounding whitespace is dropped and inner whitespace runs become hyphens.
///
/// # Errors
/// Returns [`BlockIdError::Empty`] for blank input and
/// [`BlockIdError::Invalid`] for characters outside `[-_A-Za-z0-9]`.
///
/// # Examples
///
/// ```
/// use mdcopy::block_id::{BlockIdError, normalize_manual_id};
///
/// assert_eq!(normalize_manual_id("  my  block "), Ok("my-block".to_string()));
/// assert_eq!(normalize_manual_id("   "), Err(BlockIdError::Empty));
/// assert_eq!(normalize_manual_id("a/b"), Err(BlockIdError::Invalid));
/// ```
pub fn normalize_manual_id(input: &str) -> Result<String, BlockIdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BlockIdError::Empty);
    }
    let id = WHITESPACE_RE.replace_all(trimmed, "-");
    if !VALID_ID_RE.is_match(&id) {
        return Err(BlockIdError::Invalid);
    }
    Ok(id.into_owned())
}

/// Text to insert into the document and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    pub at: Cursor,
}

fn needs_own_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('>') || trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Plan the insertion of `^id` at the end of the block.
///
/// Quote and fence lines would absorb an appended marker, so the identifier
/// goes on its own line after a blank separator there. Elsewhere it is
/// appended, separated by a space from any preceding text. Returns `None` when
/// the block already ends in an identifier.
#[must_use]
pub fn plan_insertion<L: LineSource + ?Sized>(lines: &L, range: BlockRange, id: &str) -> Option<Insertion> {
    let line = lines.line(range.end);
    if trailing_block_id(line).is_some() {
        return None;
    }
    let text = if needs_own_line(line) {
        format!("\n\n^{id}")
    } else if line.is_empty() || line.ends_with(char::is_whitespace) {
        format!("^{id}")
    } else {
        format!(" ^{id}")
    };
    Some(Insertion {
        text,
        at: Cursor::new(range.end, utf16_column(line, line.len())),
    })
}
