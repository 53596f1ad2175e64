//! Filesystem-backed document store.
//!
//! Each key maps to one file under a base directory. Writes go to a
//! temporary sibling file that is then renamed over the target, so a crash
//! mid-write leaves the previous document intact.
//!
//! # Example
//!
//! ```rust
//! use trainz_accessories::hal::FileStore;
//! use trainz_accessories::traits::ConfigStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut store = FileStore::new(dir.path());
//!
//! assert!(store.load("turnouts.json").unwrap().is_none());
//! store.store("turnouts.json", "{}").unwrap();
//! assert_eq!(store.load("turnouts.json").unwrap().as_deref(), Some("{}"));
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::ConfigStore;

/// Document store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write if missing.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Base directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    ///
    /// Keys containing path separators or `..` are refused.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key.contains(&['/', '\\'][..]) || key == "." || key == ".." {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(key))
    }
}

impl ConfigStore for FileStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Loaded {} bytes from {}", contents.len(), path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, key: &str, contents: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let tmp = self.root.join(format!(".{}.tmp", key));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        debug!("Stored {} bytes to {}", contents.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load("absent.json").unwrap().is_none());
    }

    #[test]
    fn store_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.store("doc.json", "first").unwrap();
        store.store("doc.json", "second").unwrap();
        assert_eq!(store.load("doc.json").unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join(".doc.json.tmp").exists());
    }

    #[test]
    fn store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        store.store("doc.json", "{}").unwrap();
        assert!(dir.path().join("nested").join("doc.json").exists());
    }

    #[test]
    fn path_like_keys_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(
            store.store("../escape.json", "{}"),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.load("").is_err());
    }

    #[test]
    fn read_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be read as a document.
        fs::create_dir(dir.path().join("turnouts.json")).unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.load("turnouts.json"),
            Err(StoreError::Io(_))
        ));
    }
}
