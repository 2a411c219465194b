//! Application configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[derive(Serialize, Deserialize)]` generates the TOML mapping, and
//! `#[serde(default)]` fills missing fields from `Default::default()`, so a
//! config file only needs the keys the user wants to change.
//!
//! ```toml
//! [bridge]
//! port = 9000
//!
//! [editor]
//! clear_errors_on_edit = false
//! ```

use scribe_bridge::{BridgeEndpoint, DEFAULT_HOST, DEFAULT_PORT};
use scribe_syntax::SyntaxLibrary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the compile bridge listens
    pub bridge: BridgeConfig,

    /// Editing session behavior
    pub editor: EditorConfig,

    /// Syntax resources
    pub syntax: SyntaxSettings,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from_default_path().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("scribe").join("config.toml"))
    }

    /// Writes the config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Compile bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    /// Liveness probe timeout (ms)
    pub probe_timeout_ms: u64,
    /// Connection timeout (ms)
    pub connect_timeout_ms: u64,
}

impl BridgeConfig {
    pub fn endpoint(&self) -> BridgeEndpoint {
        BridgeEndpoint {
            host: self.host.clone(),
            port: self.port,
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            probe_timeout_ms: 2000,
            connect_timeout_ms: 2000,
        }
    }
}

/// Editing session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Name the draft is autosaved under
    pub draft_file_name: String,

    /// Extension for new documents
    pub default_extension: String,

    /// Drop compiler error lines as soon as the text changes
    pub clear_errors_on_edit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            draft_file_name: "autosave_draft.txt".to_string(),
            default_extension: ".kt".to_string(),
            clear_errors_on_edit: true,
        }
    }
}

/// Syntax resource settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxSettings {
    /// Directory searched before the bundled syntax resources
    pub config_dir: Option<PathBuf>,
}

impl SyntaxSettings {
    pub fn library(&self) -> SyntaxLibrary {
        match &self.config_dir {
            Some(dir) => SyntaxLibrary::with_dir(dir),
            None => SyntaxLibrary::bundled(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
