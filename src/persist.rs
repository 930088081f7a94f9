//! JSON artifact I/O shared by the recorder and the scoring pipeline.
//!
//! Reads are forgiving: a missing, unreadable, or malformed file yields the
//! type's default value and a warning. Callers that must not lose an
//! unreadable file use [`read_json`] and [`move_to_backup`] instead.
//!
//! Writes go through a sibling temporary file and a rename so a crash never
//! leaves a half-written artifact behind.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Outcome of reading a JSON artifact that may not exist yet.
#[derive(Debug)]
pub enum JsonRead<T> {
    Missing,
    Loaded(T),
    /// The file exists but could not be read or decoded.
    Unusable(String),
}

/// Load JSON from `path`, telling a missing file apart from a bad one.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> JsonRead<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return JsonRead::Missing,
        Err(e) => return JsonRead::Unusable(e.to_string()),
    };
    match serde_json::from_str(&raw) {
        Ok(value) => JsonRead::Loaded(value),
        Err(e) => JsonRead::Unusable(e.to_string()),
    }
}

/// Load JSON from `path`, substituting `T::default()` on any failure.
pub fn read_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match read_json(path) {
        JsonRead::Loaded(value) => value,
        JsonRead::Missing => {
            debug!(path = %path.display(), "artifact missing, using empty value");
            T::default()
        }
        JsonRead::Unusable(error) => {
            warn!(path = %path.display(), %error, "unusable artifact, using empty value");
            T::default()
        }
    }
}

/// A backup name next to `path` that does not exist yet.
pub(crate) fn timestamped_backup_path(path: &Path, fallback_name: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback_name.to_string());
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    for suffix in 0..1000usize {
        let candidate_name = if suffix == 0 {
            format!("{file_name}.{timestamp}.bak")
        } else {
            format!("{file_name}.{timestamp}.{suffix}.bak")
        };
        let candidate = path.with_file_name(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
    }
    path.with_file_name(format!(
        "{file_name}.{timestamp}.{}.bak",
        std::process::id()
    ))
}

/// Rename `path` to a fresh timestamped backup.
///
/// Returns `None` when there is nothing at `path` to move.
pub fn move_to_backup(path: &Path) -> Result<Option<PathBuf>, StoreError> {
    let backup = timestamped_backup_path(path, "artifact.json");
    match fs::rename(path, &backup) {
        Ok(()) => Ok(Some(backup)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty-printed JSON, replacing `path` atomically.
pub fn write_json_pretty<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);
    fs::write(tmp_path, json).map_err(|source| StoreError::Io {
        path: tmp_path.to_path_buf(),
        source,
    })?;
    fs::rename(tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}
