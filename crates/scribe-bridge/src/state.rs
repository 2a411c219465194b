//! Connection state of the bridge as seen by the editor.

use serde::Serialize;

/// What the client is currently doing with the bridge.
///
/// ```text
///              probe_started            stream_started
/// Disconnected ──────────────► Probing ─────────────► Streaming
///      ▲                          │                       │
///      └──────── probe_finished ──┘◄──── stream_finished ─┘
/// ```
///
/// A probe during a stream leaves the state at `Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BridgeState {
    #[default]
    Disconnected,
    Probing,
    Streaming,
}

impl BridgeState {
    pub fn probe_started(self) -> Self {
        match self {
            Self::Streaming => Self::Streaming,
            _ => Self::Probing,
        }
    }

    pub fn probe_finished(self) -> Self {
        match self {
            Self::Probing => Self::Disconnected,
            other => other,
        }
    }

    pub fn stream_started(self) -> Self {
        Self::Streaming
    }

    /// Ends a stream, whether it completed, failed or was cancelled.
    pub fn stream_finished(self) -> Self {
        Self::Disconnected
    }

    pub fn is_streaming(self) -> bool {
        self == Self::Streaming
    }
}
