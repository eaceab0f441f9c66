//! Implements the `Storage` trait with one JSON file per key in a directory.

use crate::store::Storage;
use crate::{fs, Result};
use anyhow::bail;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Stores the value for `key` in `<dir>/<key>.json`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds the value for `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key)?;
        trace!("Reading {}", path.display());
        fs::read_if_exists(path)
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path(key)?;
        trace!("Writing {} bytes to {}", value.len(), path.display());
        fs::write_replace(path, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data")).unwrap();
        assert_eq!(storage.read("expenses").unwrap(), None);

        storage.write("expenses", b"[]").unwrap();
        assert_eq!(storage.read("expenses").unwrap(), Some(b"[]".to_vec()));
        assert!(dir.path().join("data").join("expenses.json").is_file());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path()).unwrap();
        assert!(storage.write("../escape", b"x").is_err());
        assert!(storage.read("").is_err());
    }
}
