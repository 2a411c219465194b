//! Compile status shown next to the compile output.

use std::fmt;

/// What the compile indicator currently says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    NotConnected,
    Compiling,
    Success,
    Failed,
}

impl CompileStatus {
    /// Returns the display string. `Idle` shows nothing.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Connecting => "Connecting…",
            Self::Connected => "Connected",
            Self::NotConnected => "Not connected",
            Self::Compiling => "Compiling…",
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }

    /// Returns true while a probe or compile is outstanding.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Connecting | Self::Compiling)
    }
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
