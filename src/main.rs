use std::{
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mdcopy::{
    CopyOutcome, Cursor, Host, Settings, classify_and_copy, copy_document_self_link,
    copy_heading_or_note_link, generate_and_copy_block_link,
    io::{BufferClipboard, LinePrompt, MarkdownFile, StreamNotifier},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Copy the Markdown construct under a cursor")]
struct Cli {
    /// Settings file in TOML format
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct Target {
    /// Markdown file to read
    file: PathBuf,
    /// Zero-based cursor line
    #[arg(long, default_value_t = 0)]
    line: usize,
    /// Zero-based cursor column in UTF-16 code units
    #[arg(long, default_value_t = 0)]
    column: usize,
    /// Write an inserted block identifier back to the file
    #[arg(long = "in-place")]
    in_place: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Copy whatever the cursor points at
    Copy(Target),
    /// Copy a link to the heading above the cursor
    Heading(Target),
    /// Copy a link to the block around the cursor, adding an identifier if needed
    Block {
        #[command(flatten)]
        target: Target,
        /// Read the identifier from stdin instead of generating one
        #[arg(long)]
        manual: bool,
    },
    /// Copy a link to the note itself
    Note(Target),
}

impl Command {
    fn target(&self) -> &Target {
        match self {
            Self::Copy(target)
            | Self::Heading(target)
            | Self::Note(target)
            | Self::Block { target, .. } => target,
        }
    }

    fn run(&self, host: &mut Host<'_>, settings: &Settings) -> CopyOutcome {
        match self {
            Self::Copy(_) => classify_and_copy(host, settings),
            Self::Heading(_) => copy_heading_or_note_link(host, settings),
            Self::Note(_) => copy_document_self_link(host, settings),
            Self::Block { manual, .. } => generate_and_copy_block_link(host, settings, *manual),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Entry point for the command-line host.
///
/// Loads the file at the given cursor, runs one copy operation, and prints
/// the copied text to stdout. Notices go to stderr. With `--in-place`, a block
/// identifier inserted by the operation is saved back to the file.
///
/// # Examples
///
/// ```sh
/// # Copy the span under line 3, column 12
/// mdcopy copy notes.md --line 3 --column 12
///
/// # Link to the paragraph at line 8 and store its new identifier
/// mdcopy block notes.md --line 8 --in-place
///
/// # Choose the identifier yourself
/// echo "my-id" | mdcopy block notes.md --line 8 --manual --in-place
/// ```
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::default(),
    };

    let target = cli.command.target();
    let mut document = MarkdownFile::open(&target.file, Cursor::new(target.line, target.column))
        .with_context(|| format!("cannot open {}", target.file.display()))?;
    let mut clipboard = BufferClipboard::default();
    let mut notifier = StreamNotifier::new(io::stderr());
    let mut prompt = LinePrompt::new(BufReader::new(io::stdin()), io::stderr());

    let mut host = Host {
        document: Some(&mut document),
        clipboard: &mut clipboard,
        notifier: &mut notifier,
        prompt: &mut prompt,
    };
    let outcome = cli.command.run(&mut host, &settings);
    tracing::debug!(?outcome, "operation finished");

    if let Some(text) = clipboard.text() {
        println!("{text}");
    }
    if target.in_place && document.is_modified() {
        document.save()?;
    }
    Ok(())
}
