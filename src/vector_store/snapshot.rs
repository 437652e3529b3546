//! Snapshot file format: a pretty-printed JSON array of records.

use super::VectorRecord;
use crate::error::{QaError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the snapshot inside its directory.
pub const SNAPSHOT_FILE: &str = "vectordb.json";

/// Location of the snapshot file for `dir`.
pub fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join(SNAPSHOT_FILE)
}

/// Write `records` to `dir/vectordb.json`, replacing any previous snapshot.
///
/// The JSON is written to a temporary file in `dir` and renamed into place.
pub fn write_snapshot(dir: &Path, records: &[VectorRecord]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = snapshot_path(dir);

    let json = serde_json::to_string_pretty(records)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    file.persist(&path).map_err(|e| QaError::Io(e.error))?;

    Ok(path)
}

/// Read every record from `dir/vectordb.json`.
pub fn read_snapshot(dir: &Path) -> Result<Vec<VectorRecord>> {
    let path = snapshot_path(dir);
    if !path.is_file() {
        return Err(QaError::SnapshotNotFound(path));
    }

    let content = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}
