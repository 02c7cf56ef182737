//! Snapshot file codec.
//!
//! Every store persists its full record set as one JSON array file. Writes
//! rewrite the whole file; reads happen once, at store construction.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppResult;

/// Load all records from a snapshot file.
///
/// A missing or empty file yields an empty record set so a store can
/// bootstrap itself on first run. A present-but-unparseable file is an
/// error: silently discarding data is worse than refusing to start.
pub fn load<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    if !path.exists() {
        tracing::debug!("snapshot {} not found, starting empty", path.display());
        return Ok(Vec::new());
    }

    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_slice(&bytes)?)
}

/// Write all records to a snapshot file, replacing its previous contents.
pub fn save<T: Serialize>(path: &Path, records: &[T]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
