//! Blocking file helpers used by the engine-side storage adapter.

use crate::Result;
use anyhow::Context;
use std::io::{ErrorKind, Write};
use std::path::Path;

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).context(format!("Unable to create directory {}", path.display()))
}

/// Reads the file at `path`, returning `None` if it does not exist.
pub(crate) fn read_if_exists(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context(format!("Unable to read file {}", path.display())),
    }
}

/// Replaces the contents of `path` by writing a sibling temp file and renaming it into place, so
/// that a crash mid-write leaves the previous contents intact.
pub(crate) fn write_replace(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    let mut f =
        std::fs::File::create(tmp).context(format!("Unable to create file {}", tmp.display()))?;
    f.write_all(data)
        .context(format!("Unable to write data to {}", tmp.display()))?;
    f.sync_all()
        .context(format!("Unable to flush {}", tmp.display()))?;
    std::fs::rename(tmp, path).context(format!(
        "Unable to move {} to {}",
        tmp.display(),
        path.display()
    ))
}

#[test]
fn write_replace_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("x.json");
    assert_eq!(read_if_exists(&path).unwrap(), None);
    write_replace(&path, b"one").unwrap();
    write_replace(&path, b"two").unwrap();
    assert_eq!(read_if_exists(&path).unwrap(), Some(b"two".to_vec()));
    assert!(!tempdir.path().join("x.json.tmp").exists());
}

#[test]
fn create_dir_all_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let nested = tempdir.path().join("a").join("b");
    create_dir_all(&nested).unwrap();
    create_dir_all(&nested).unwrap();
    assert!(nested.is_dir());
}
