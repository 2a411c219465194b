//! Document persistence.
//!
//! ## Learning: Trait Objects at the I/O Seam
//!
//! The session never touches the filesystem directly. It goes through
//! `Box<dyn DocumentStore>`, so the editor works the same against the
//! real disk, a sandbox directory or an in-memory fake in tests.

use std::io;
use std::path::{Path, PathBuf};

/// Read/write access to documents and the autosave draft.
///
/// Handles are paths; how they are resolved is up to the store.
pub trait DocumentStore: Send {
    fn load(&self, handle: &Path) -> io::Result<String>;
    fn save(&self, handle: &Path, text: &str) -> io::Result<()>;
}

/// A store on the local filesystem.
///
/// Relative handles resolve against `root`; absolute handles are used as is.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, handle: &Path) -> PathBuf {
        self.root.join(handle)
    }
}

impl DocumentStore for FsDocumentStore {
    fn load(&self, handle: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(handle))
    }

    fn save(&self, handle: &Path, text: &str) -> io::Result<()> {
        let path = self.resolve(handle);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write to a temporary file first, then rename (atomic write)
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);
        std::fs::write(&temp_path, text.as_bytes())?;
        std::fs::rename(&temp_path, &path)
    }
}
