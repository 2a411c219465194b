//! # Scribe Core
//!
//! Session state, its transition function and the editor facade.
//!
//! ## Architecture Overview
//!
//! ```text
//!   BridgeClient   SyntaxLibrary   DocumentStore   Clipboard
//!        │               │               │              │
//!        └───────────────┴── Editor ─────┴──────────────┘
//!                            │
//!                      SessionEvent
//!                            │
//!                SessionState::apply (pure)
//!                            │
//!          render() ──► StyledSequence     EventBus ──► UI
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod clipboard;
pub mod config;
pub mod editor;
pub mod event;
pub mod language;
pub mod session;
pub mod status;
pub mod storage;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use config::{Config, ConfigError};
pub use editor::Editor;
pub use event::{EventBus, EventHandler, SessionNotification};
pub use language::{LanguageMode, NEW_FILE_EXTENSIONS};
pub use session::{SessionEvent, SessionState};
pub use status::CompileStatus;
pub use storage::{DocumentStore, FsDocumentStore};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Document has no save location; suggested name: {suggested}")]
    NoSaveTarget { suggested: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] scribe_bridge::BridgeError),
}
