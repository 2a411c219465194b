//! # Scribe Bridge
//!
//! Client for the compile bridge: a small HTTP service on the local machine
//! that runs the real compiler and streams its output back line by line.
//!
//! ## Protocol
//!
//! ```text
//! GET  /health   → 200 means "alive"
//! POST /compile  {"filename": "...", "code": "..."}
//!                ← diagnostic text, one line at a time
//!                ← {"ok": true|false}          (optional status line)
//! ```
//!
//! ## Learning: Streaming with `async`
//!
//! `reqwest::Response::chunk()` yields the body as it arrives. Chunks have
//! no relation to line boundaries, so a `LineSplitter` buffers the partial
//! tail of each chunk until the rest of the line shows up.
//!
//! ## Resource Release
//!
//! The response owns the connection. It is dropped when `compile` returns
//! (success or error), when its future is dropped (cancellation), and when
//! a line callback panics (unwinding), so there is no path that leaks it.

mod client;
mod diagnostics;
mod endpoint;
mod lines;
mod state;

pub use client::{BridgeClient, CompileOutcome};
pub use diagnostics::{extract_line_numbers, record_diagnostic};
pub use endpoint::{BridgeEndpoint, DEFAULT_HOST, DEFAULT_PORT};
pub use lines::{LineSplitter, StreamLine};
pub use state::BridgeState;

use reqwest::StatusCode;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur talking to the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Timed out waiting for the compile bridge")]
    Timeout,

    /// The bridge answered with a non-success status.
    ///
    /// `message` is the body the bridge sent with the error, or the status
    /// line when the body was blank.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),
}

impl BridgeError {
    /// Builds a status error, falling back to the status line for blank bodies.
    pub fn status(status: StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            match status.canonical_reason() {
                Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
                None => format!("HTTP {}", status.as_u16()),
            }
        } else {
            body.trim().to_string()
        };
        Self::Status { status, message }
    }

    /// Human-readable reason for the status display.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}
