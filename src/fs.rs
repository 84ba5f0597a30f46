//! Blocking file helpers used by the transaction store, which does its I/O synchronously.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::Path;

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).context(format!("Unable to create directory {}", path.display()))
}

pub(crate) fn write_all(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let mut f =
        std::fs::File::create(path).context(format!("Unable to create file {}", path.display()))?;
    f.write_all(data.as_ref())
        .context(format!("Unable to write data to {}", path.display()))?;
    f.sync_all()
        .context(format!("Unable to flush data to {}", path.display()))
}

/// Reads the file at `path`. A missing file is `Ok(None)`, any other failure is an error.
pub(crate) fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            _ => Err(e).context(format!("Unable to read file {}", path.display())),
        },
    }
}

#[test]
fn read_optional_missing_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let found = read_optional(tempdir.path().join("nope.json")).unwrap();
    assert!(found.is_none());
}

#[test]
fn write_then_read_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let dir = tempdir.path().join("x").join("y");
    create_dir_all(&dir).unwrap();
    let path = dir.join("data.json");
    write_all(&path, "[]").unwrap();
    write_all(&path, "[1]").unwrap();
    assert_eq!(Some("[1]".to_string()), read_optional(&path).unwrap());
}
