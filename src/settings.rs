//! User settings that steer classification and link synthesis.
//!
//! The host owns and persists the settings; the core receives a shared
//! reference for the duration of one classify-and-copy cycle and derives
//! everything it needs from it on each call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::span::{Construct, RegexFlavor};

/// Errors raised while loading settings from disk.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Syntax used for synthesised links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkFormat {
    /// `[display](target)`
    MarkdownLink,
    /// `[[target|display]]`
    #[default]
    WikiLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "settings mirror independent user-facing toggles"
)]
pub struct Settings {
    pub use_frontmatter_as_display: bool,
    pub frontmatter_key: String,
    /// Host UI flag: offer the copy command in the editor context menu. Not
    /// read by the core; carried so host settings files round-trip.
    pub add_to_menu: bool,
    /// Host UI flag: register the heading, block and note commands. Not read
    /// by the core.
    pub add_extra_commands: bool,
    pub show_notice: bool,
    pub use_heading_as_display_text: bool,
    pub link_format: LinkFormat,
    /// Separator placed between the note name and heading in display text.
    pub heading_separator: String,
    pub customize_targets: bool,
    pub enable_inline_code: bool,
    pub enable_bold: bool,
    pub enable_highlight: bool,
    pub enable_italic: bool,
    pub enable_strikethrough: bool,
    pub enable_inline_latex: bool,
    pub enable_link: bool,
    pub enable_wiki_link: bool,
    pub keep_wiki_brackets: bool,
    /// Prefix block links with `!` so they embed the block.
    pub auto_embed_block_link: bool,
    pub enable_callout_copy: bool,
    /// Prefer the callout over a generated block identifier.
    pub callout_copy_priority: bool,
    pub auto_add_block_id: bool,
    pub allow_manual_block_id: bool,
    pub auto_block_display_text: bool,
    pub block_display_word_limit: usize,
    pub block_display_char_limit: usize,
    pub regex_flavor: RegexFlavor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_frontmatter_as_display: false,
            frontmatter_key: "title".to_string(),
            add_to_menu: true,
            add_extra_commands: true,
            show_notice: true,
            use_heading_as_display_text: true,
            link_format: LinkFormat::WikiLink,
            heading_separator: "#".to_string(),
            customize_targets: false,
            enable_inline_code: true,
            enable_bold: true,
            enable_highlight: true,
            enable_italic: true,
            enable_strikethrough: true,
            enable_inline_latex: true,
            enable_link: true,
            enable_wiki_link: true,
            keep_wiki_brackets: true,
            auto_embed_block_link: false,
            enable_callout_copy: true,
            callout_copy_priority: true,
            auto_add_block_id: false,
            allow_manual_block_id: false,
            auto_block_display_text: true,
            block_display_word_limit: 3,
            block_display_char_limit: 5,
            regex_flavor: RegexFlavor::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Keys absent from the file keep their
    /// default values.
    ///
    /// # Errors
    /// Returns [`SettingsError`] if the file cannot be read or parsed.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// Returns the TOML deserialisation error for malformed input.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Whether `construct` may be matched under the current settings.
    ///
    /// With target customisation off every construct is eligible; otherwise the
    /// construct's own flag decides.
    #[must_use]
    pub fn enabled(&self, construct: Construct) -> bool {
        if !self.customize_targets {
            return true;
        }
        match construct {
            Construct::Bold => self.enable_bold,
            Construct::Italic => self.enable_italic,
            Construct::Highlight => self.enable_highlight,
            Construct::Strikethrough => self.enable_strikethrough,
            Construct::InlineCode => self.enable_inline_code,
            Construct::InlineLatex => self.enable_inline_latex,
            Construct::WikiLink => self.enable_wiki_link,
        }
    }

    /// Whether Markdown `[title](url)` links may be matched.
    #[must_use]
    pub fn link_enabled(&self) -> bool {
        !self.customize_targets || self.enable_link
    }
}
