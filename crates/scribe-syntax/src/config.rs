//! Declarative syntax configuration.
//!
//! A syntax configuration is a small JSON object:
//!
//! ```json
//! {
//!   "keywords": ["def", "return"],
//!   "types": ["int"],
//!   "comments": { "line": "#", "blockStart": "\"\"\"", "blockEnd": "\"\"\"" },
//!   "strings": "\""
//! }
//! ```
//!
//! ## Learning: Lenient Parsing with `serde_json::Value`
//!
//! A derived `Deserialize` rejects the whole document when one field has the
//! wrong type. Configuration files are user data, so instead we parse into
//! an untyped `Value` and pick fields out one by one: a malformed field only
//! disables the feature it describes.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::{SyntaxError, SyntaxResult};

/// Comment markers of a configured language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    pub line: Option<String>,
    pub block_start: Option<String>,
    pub block_end: Option<String>,
}

/// Keyword, type, comment and string description of a language.
///
/// Immutable once loaded. Empty strings are never stored as markers, so an
/// `Option` being `Some` always means "this feature is enabled".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxConfig {
    pub keywords: BTreeSet<String>,
    pub types: BTreeSet<String>,
    pub comments: Option<CommentConfig>,
    pub string_delimiter: Option<String>,
}

impl SyntaxConfig {
    /// Parses a configuration, degrading malformed fields to "absent".
    ///
    /// Fails only if the document is not JSON or not an object.
    pub fn from_json(json: &str) -> SyntaxResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let obj = value.as_object().ok_or(SyntaxError::NotAnObject)?;

        let comments = obj.get("comments").and_then(Value::as_object).map(|c| CommentConfig {
            line: marker(c, "line"),
            block_start: marker(c, "blockStart"),
            block_end: marker(c, "blockEnd"),
        });

        Ok(Self {
            keywords: string_set(obj, "keywords"),
            types: string_set(obj, "types"),
            comments,
            string_delimiter: marker(obj, "strings"),
        })
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SyntaxResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Returns the line comment marker, if configured.
    pub fn line_comment(&self) -> Option<&str> {
        self.comments.as_ref()?.line.as_deref()
    }

    /// Returns both block comment markers, if both are configured.
    pub fn block_comment(&self) -> Option<(&str, &str)> {
        let comments = self.comments.as_ref()?;
        Some((comments.block_start.as_deref()?, comments.block_end.as_deref()?))
    }
}

fn string_set(obj: &Map<String, Value>, key: &str) -> BTreeSet<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn marker(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

const BUNDLED: &[(&str, &str)] = &[
    ("python.json", include_str!("../assets/python.json")),
    ("java.json", include_str!("../assets/java.json")),
];

/// Resolves named syntax resources such as `"python.json"`.
///
/// A configured directory is searched first, then the resources bundled
/// into the binary.
#[derive(Debug, Clone, Default)]
pub struct SyntaxLibrary {
    dir: Option<PathBuf>,
}

impl SyntaxLibrary {
    /// A library with only the bundled resources.
    pub fn bundled() -> Self {
        Self::default()
    }

    /// A library that prefers files in `dir` over the bundled resources.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Names of the bundled resources.
    pub fn bundled_names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }

    /// Loads a resource, or `None` if it is missing or unparsable.
    pub fn load(&self, name: &str) -> Option<SyntaxConfig> {
        match self.try_load(name) {
            Ok(config) => {
                tracing::debug!(
                    name,
                    keywords = config.keywords.len(),
                    types = config.types.len(),
                    "loaded syntax configuration"
                );
                Some(config)
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "syntax configuration unavailable");
                None
            }
        }
    }

    fn try_load(&self, name: &str) -> SyntaxResult<SyntaxConfig> {
        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if path.is_file() {
                return SyntaxConfig::from_file(path);
            }
        }

        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .ok_or_else(|| SyntaxError::NotFound(name.to_string()))
            .and_then(|(_, json)| SyntaxConfig::from_json(json))
    }
}
