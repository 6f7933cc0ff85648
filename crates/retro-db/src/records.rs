//! JSON record codec.
//!
//! Records are pretty-printed with four-space indentation. Writes go to a
//! temporary file in the record's directory and are renamed into place, so
//! readers never observe a partially written record. List records are never
//! stored empty: writing an empty list deletes the file, and a missing file
//! reads as an empty list.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

use crate::error::StoreError;

/// Read and decode a JSON record. `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns `StoreError::Decode` for malformed content and `StoreError::Io`
/// for other filesystem failures.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path)(err)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode `value` and atomically replace the record at `path`.
///
/// # Errors
///
/// Returns `StoreError::Encode` or `StoreError::Io`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut bytes = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    bytes.push(b'\n');

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(StoreError::io(dir))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(StoreError::io(dir))?;
    tmp.write_all(&bytes).map_err(StoreError::io(tmp.path()))?;
    tmp.as_file().sync_all().map_err(StoreError::io(path))?;
    tmp.persist(path)
        .map_err(|err| StoreError::io(path)(err.error))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "record written");
    Ok(())
}

/// Read a list record; a missing file is an empty list.
///
/// # Errors
///
/// Same as [`read_json`].
pub fn read_list(path: &Path) -> Result<Vec<String>, StoreError> {
    Ok(read_json(path)?.unwrap_or_default())
}

/// Write a list record; an empty list removes the file.
///
/// # Errors
///
/// Same as [`write_json`].
pub fn write_list(path: &Path, items: &[String]) -> Result<(), StoreError> {
    if !items.is_empty() {
        return write_json(path, items);
    }
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "empty record removed");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StoreError::io(path)(err)),
    }
}
