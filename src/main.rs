//! # Scribe
//!
//! Command-line host for the highlighting pipeline and the compile bridge.
//!
//! ## Quick Start
//!
//! ```bash
//! # Styled runs of a file as JSON
//! cargo run -- highlight src/Main.kt --find main --errors 3
//!
//! # Is the compile bridge up?
//! cargo run -- check
//!
//! # Stream a compile
//! cargo run -- compile src/Main.kt
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use scribe_buffer::{ErrorLineSet, StyledRun, TextSnapshot};
use scribe_core::{
    CompileStatus, Config, Editor, EventHandler, FsDocumentStore, LanguageMode, MemoryClipboard,
    SessionNotification,
};
use scribe_syntax::{SearchQuery, SyntaxConfig, compose, highlight, tokenize};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scribe - layered highlighting and streaming compile feedback
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the bridge port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the styled runs of a file as JSON
    Highlight(HighlightArgs),

    /// Probe the compile bridge
    Check,

    /// Compile a file through the bridge, streaming its output
    Compile {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct HighlightArgs {
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Language mode: kotlin, python or java
    #[arg(short, long, default_value = "kotlin")]
    language: String,

    /// Syntax configuration file; overrides --language
    #[arg(long, value_name = "JSON")]
    syntax: Option<PathBuf>,

    /// Highlight matches of this text
    #[arg(long)]
    find: Option<String>,

    /// Case-sensitive find
    #[arg(short = 'c', long)]
    case_sensitive: bool,

    /// Whole-word find
    #[arg(short = 'w', long)]
    whole_word: bool,

    /// 1-based lines to mark as errors
    #[arg(long, value_delimiter = ',')]
    errors: Vec<usize>,
}

#[derive(Serialize)]
struct HighlightReport {
    file: String,
    language: String,
    chars: usize,
    words: usize,
    lines: usize,
    runs: Vec<StyledRun>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(port) = args.port {
        config.bridge.port = port;
    }

    match args.command {
        Command::Highlight(highlight_args) => {
            let report = run_highlight(&highlight_args, &config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => run_check(config).await,
        Command::Compile { file } => run_compile(config, &file).await,
    }
}

fn run_highlight(args: &HighlightArgs, config: &Config) -> anyhow::Result<HighlightReport> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let text = TextSnapshot::from(text);

    let (language, base) = match &args.syntax {
        Some(path) => {
            let syntax = SyntaxConfig::from_file(path)
                .with_context(|| format!("failed to load syntax from {}", path.display()))?;
            (display_name(path), highlight(&text, Some(&syntax)))
        }
        None => {
            let mode = LanguageMode::from_name(&args.language)
                .with_context(|| format!("unknown language '{}'", args.language))?;
            let base = match mode.resource() {
                None => tokenize(&text),
                Some(name) => highlight(&text, config.syntax.library().load(name).as_ref()),
            };
            (mode.label(), base)
        }
    };

    let query = SearchQuery::new(args.find.clone().unwrap_or_default())
        .case_sensitive(args.case_sensitive)
        .whole_word(args.whole_word);
    let errors: ErrorLineSet = args.errors.iter().copied().collect();
    let styled = compose(&base, &query, &errors);

    let stats = text.stats();
    Ok(HighlightReport {
        file: display_name(&args.file),
        language,
        chars: stats.chars,
        words: stats.words,
        lines: stats.lines,
        runs: styled.runs(),
    })
}

/// Store for one-shot commands.
///
/// Opening a file autosaves the draft, so the CLI keeps its drafts in a
/// scratch directory instead of a user's data directory.
fn scratch_store() -> FsDocumentStore {
    FsDocumentStore::new(std::env::temp_dir().join("scribe-cli"))
}

fn editor(config: Config, store: FsDocumentStore) -> anyhow::Result<Editor> {
    tracing::debug!(root = %store.root().display(), "document store");
    Ok(Editor::new(
        config,
        Box::new(store),
        Box::new(MemoryClipboard::new()),
    )?)
}

async fn run_check(config: Config) -> anyhow::Result<ExitCode> {
    let mut editor = editor(config, scratch_store())?;
    editor.connect();
    while editor.state().status.is_pending() && editor.process_next().await {}

    let state = editor.state();
    match &state.status_detail {
        Some(reason) => println!("{}: {}", state.status, reason),
        None => println!("{}", state.status),
    }
    Ok(exit_code(state.connected))
}

async fn run_compile(config: Config, file: &Path) -> anyhow::Result<ExitCode> {
    // Absolute, so the store does not resolve it against its own root
    let file = std::path::absolute(file)
        .with_context(|| format!("invalid path {}", file.display()))?;

    let mut editor = editor(config, scratch_store())?;
    let mut notifications = EventHandler::new(editor.subscribe());
    editor.open(&file)?;
    editor.compile();

    while editor.state().status.is_pending() && editor.process_next().await {
        while let Some(notification) = notifications.try_next() {
            if let SessionNotification::CompileLine(line) = notification {
                println!("{line}");
            }
        }
    }

    let state = editor.state();
    if !state.errors.is_empty() {
        let lines: Vec<String> = state.errors.iter().map(|n| n.to_string()).collect();
        eprintln!("error lines: {}", lines.join(", "));
    }
    match &state.status_detail {
        Some(reason) => eprintln!("{}: {}", state.status, reason),
        None => eprintln!("{}", state.status),
    }
    Ok(exit_code(state.status == CompileStatus::Success))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
