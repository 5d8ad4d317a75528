//! JSON persistence helpers
//!
//! Data files are whole-file JSON documents. Writes go to a sibling temp
//! file that is synced and renamed over the target, so a crash leaves
//! either the old or the new document on disk.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CashbookError;

/// Read a JSON document, or `T::default()` if the file does not exist yet
pub fn read_json<T, P>(path: P) -> Result<T, CashbookError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(CashbookError::file("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        CashbookError::Storage(format!("{} is not a valid data file: {}", path.display(), e))
    })
}

/// Sibling temp path; the rename is only atomic within one directory
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Replace `path` with the JSON encoding of `data`
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), CashbookError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CashbookError::file("create", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_synced(&temp_path, data)
        .and_then(|_| fs::rename(&temp_path, path).map_err(|e| CashbookError::file("replace", path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), CashbookError> {
    let file = File::create(temp_path).map_err(|e| CashbookError::file("create", temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| CashbookError::Json(format!("Failed to encode {}: {}", temp_path.display(), e)))?;
    writer
        .flush()
        .map_err(|e| CashbookError::file("write", temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| CashbookError::file("sync", temp_path, e))
}
