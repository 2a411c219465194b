//! Editing session state and its transition function.
//!
//! ## Learning: State as a Value
//!
//! Instead of many independently mutable fields, the whole session is one
//! value and every change is an event:
//!
//! ```text
//! state₀ ──apply(e₁)──► state₁ ──apply(e₂)──► state₂ ...
//! ```
//!
//! `apply` takes the state by value and returns the next one. It performs
//! no I/O, so anything that needs the disk, the clipboard or the network
//! happens in [`crate::Editor`] and arrives here as an event carrying the
//! result. Rendering is likewise a pure function of the state.
//!
//! ## Compile Generations
//!
//! Each compile gets a generation number. Stream events carry the
//! generation they belong to and are dropped if it is not the current one,
//! so lines from a superseded compile can never reach the error set of the
//! next.

use scribe_bridge::{BridgeState, StreamLine, record_diagnostic};
use scribe_buffer::{DocumentStats, ErrorLineSet, Selection, StyledSequence, TextSnapshot};
use scribe_syntax::{SearchQuery, SyntaxConfig, compose, highlight, tokenize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EditorConfig;
use crate::language::{LanguageMode, is_new_file_extension};
use crate::status::CompileStatus;

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // Text field
    /// The field reports new text and selection
    Edited { text: TextSnapshot, selection: Selection },
    /// The selection moved without a text change
    SelectionChanged(Selection),
    /// Selection was copied to the clipboard and removed
    Cut,
    /// Clipboard text replaces the selection
    Pasted(String),

    // Find / replace
    QueryChanged(String),
    CaseSensitiveChanged(bool),
    WholeWordChanged(bool),
    ReplacementChanged(String),
    FindNext,
    ReplaceCurrent,
    ReplaceAll,

    // Language
    /// A mode was chosen; `syntax` is its loaded resource, if any
    LanguageSelected {
        mode: LanguageMode,
        syntax: Option<SyntaxConfig>,
    },
    /// Extension for new documents; ignored unless it is offered
    ExtensionSelected(String),

    // Documents
    NewDocument,
    DocumentOpened { handle: PathBuf, text: String },
    DocumentSaved { handle: PathBuf },
    DraftRestored(String),

    // Bridge
    ConnectStarted,
    ConnectFinished(Result<(), String>),
    CompileStarted { generation: u64 },
    CompileLine { generation: u64, line: StreamLine },
    /// `Ok(ok)` when the stream drained, `Err(reason)` on failure
    CompileFinished {
        generation: u64,
        result: Result<bool, String>,
    },
    CompileCancelled { generation: u64 },
}

/// Immutable snapshot of the editing session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub text: TextSnapshot,
    pub selection: Selection,

    /// Display name of the document
    pub file_name: String,
    /// Where the document was opened from or saved to
    pub handle: Option<PathBuf>,
    pub new_file_extension: String,

    pub language: LanguageMode,
    pub syntax: Option<Arc<SyntaxConfig>>,

    pub query: SearchQuery,
    pub replacement: String,

    pub errors: ErrorLineSet,
    pub status: CompileStatus,
    /// Reason behind the last failed probe or compile
    pub status_detail: Option<String>,
    /// Every streamed line, each followed by `\n`
    pub output: String,
    pub connected: bool,
    pub bridge: BridgeState,
    pub compile_generation: u64,

    pub clear_errors_on_edit: bool,
}

impl SessionState {
    /// Creates an empty `Untitled` session.
    pub fn new(config: &EditorConfig) -> Self {
        let new_file_extension = if is_new_file_extension(&config.default_extension) {
            config.default_extension.clone()
        } else {
            LanguageMode::BuiltIn.extension().to_string()
        };
        Self {
            file_name: format!("Untitled{new_file_extension}"),
            new_file_extension,
            clear_errors_on_edit: config.clear_errors_on_edit,
            ..Default::default()
        }
    }

    /// Returns the state after `event`.
    pub fn apply(mut self, event: SessionEvent) -> Self {
        use SessionEvent::*;

        match event {
            Edited { text, selection } => self.set_text(text, selection),
            SelectionChanged(selection) => self.selection = selection.clamp_to(self.text.as_str()),
            Cut => {
                let range = self.selection.range();
                if let Ok(text) = self.text.replace_range(range.clone(), "") {
                    self.set_text(text, Selection::cursor(range.start));
                }
            }
            Pasted(clip) => {
                let start = self.selection.start;
                if let Ok(text) = self.text.replace_range(self.selection.range(), &clip) {
                    self.set_text(text, Selection::cursor(start + clip.len()));
                }
            }

            QueryChanged(text) => self.query.text = text,
            CaseSensitiveChanged(on) => self.query.case_sensitive = on,
            WholeWordChanged(on) => self.query.whole_word = on,
            ReplacementChanged(text) => self.replacement = text,
            FindNext => {
                if let Some(found) = self.query.find_next(self.text.as_str(), self.selection.end) {
                    self.selection = found.into();
                }
            }
            ReplaceCurrent => {
                if let Some((text, selection)) =
                    self.query
                        .replace_current(&self.text, self.selection, &self.replacement)
                {
                    self.set_text(text, selection);
                }
            }
            ReplaceAll => {
                if let Some(text) = self.query.replace_all(&self.text, &self.replacement) {
                    let selection = self.selection;
                    self.set_text(text, selection);
                }
            }

            LanguageSelected { mode, syntax } => {
                self.new_file_extension = mode.extension().to_string();
                self.syntax = syntax.map(Arc::new);
                self.language = mode;
            }
            ExtensionSelected(ext) => {
                if is_new_file_extension(&ext) {
                    self.new_file_extension = ext;
                } else {
                    tracing::debug!(ext, "ignoring unsupported extension");
                }
            }

            NewDocument => {
                self.set_text(TextSnapshot::new(), Selection::default());
                self.handle = None;
                self.file_name = format!("Untitled{}", self.new_file_extension);
            }
            DocumentOpened { handle, text } => {
                let end = text.len();
                self.set_text(text.into(), Selection::cursor(end));
                self.file_name = display_name(&handle);
                self.handle = Some(handle);
            }
            DocumentSaved { handle } => {
                self.file_name = display_name(&handle);
                self.handle = Some(handle);
            }
            DraftRestored(text) => {
                let end = text.len();
                self.set_text(text.into(), Selection::cursor(end));
            }

            ConnectStarted => {
                self.status = CompileStatus::Connecting;
                self.status_detail = None;
                self.bridge = self.bridge.probe_started();
            }
            ConnectFinished(result) => {
                self.bridge = self.bridge.probe_finished();
                self.connected = result.is_ok();
                // A compile started meanwhile owns the indicator
                if self.status == CompileStatus::Connecting {
                    self.status = if self.connected {
                        CompileStatus::Connected
                    } else {
                        CompileStatus::NotConnected
                    };
                    self.status_detail = result.err();
                }
            }
            CompileStarted { generation } => {
                self.compile_generation = generation;
                self.errors.clear();
                self.output.clear();
                self.status = CompileStatus::Compiling;
                self.status_detail = None;
                self.bridge = self.bridge.stream_started();
            }
            CompileLine { generation, line } => {
                if self.is_current_compile(generation) {
                    if let Some(diagnostic) = line.diagnostic() {
                        record_diagnostic(&mut self.errors, diagnostic);
                    }
                    self.output.push_str(line.text());
                    self.output.push('\n');
                }
            }
            CompileFinished { generation, result } => {
                if self.is_current_compile(generation) {
                    self.bridge = self.bridge.stream_finished();
                    match result {
                        Ok(true) => self.status = CompileStatus::Success,
                        Ok(false) => self.status = CompileStatus::Failed,
                        Err(reason) => {
                            self.status = CompileStatus::Failed;
                            self.status_detail = Some(reason);
                        }
                    }
                }
            }
            CompileCancelled { generation } => {
                if self.is_current_compile(generation) {
                    self.bridge = self.bridge.stream_finished();
                    self.status = CompileStatus::Idle;
                }
            }
        }
        self
    }

    fn set_text(&mut self, text: TextSnapshot, selection: Selection) {
        if text != self.text && self.clear_errors_on_edit && !self.errors.is_empty() {
            tracing::trace!(lines = self.errors.len(), "clearing stale error lines");
            self.errors.clear();
        }
        self.selection = selection.clamp_to(text.as_str());
        self.text = text;
    }

    /// Builds the styled sequence: base layer, then search, then errors.
    pub fn render(&self) -> StyledSequence {
        let base = match self.language {
            LanguageMode::BuiltIn => tokenize(&self.text),
            LanguageMode::Configured { .. } => highlight(&self.text, self.syntax.as_deref()),
        };
        compose(&base, &self.query, &self.errors)
    }

    pub fn stats(&self) -> DocumentStats {
        self.text.stats()
    }

    /// The selected text, or `None` for a cursor.
    pub fn selected_text(&self) -> Option<&str> {
        if self.selection.is_cursor() {
            return None;
        }
        self.text.slice(self.selection.range()).ok()
    }

    /// Name to offer when saving a document that has no handle yet.
    pub fn suggested_save_name(&self) -> String {
        if self.file_name.ends_with(&self.new_file_extension) {
            self.file_name.clone()
        } else {
            format!("Untitled{}", self.new_file_extension)
        }
    }

    /// True while `generation` is the compile still running. A cancelled or
    /// finished compile no longer accepts stream events.
    pub fn is_current_compile(&self, generation: u64) -> bool {
        generation == self.compile_generation && self.status == CompileStatus::Compiling
    }
}

fn display_name(handle: &std::path::Path) -> String {
    handle
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| handle.display().to_string())
}
