//! Local key/value persistence
//!
//! Values are stored as JSON:
//! - wasm32: one LocalStorage item per key
//! - native: `<data dir>/<key>.json`, data dir from `ROAD_DODGE_DATA_DIR`
//!   (default `.road-dodge`)

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Environment variable overriding the native data directory
pub const DATA_DIR_ENV: &str = "ROAD_DODGE_DATA_DIR";
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_DATA_DIR: &str = ".road-dodge";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Load and decode a value; `Ok(None)` if nothing is stored under `key`
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>, PersistenceError> {
    match read_raw(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and store a value under `key`
pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    write_raw(key, &json)
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PersistenceError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| PersistenceError::Unavailable("LocalStorage not accessible".into()))
}

#[cfg(target_arch = "wasm32")]
fn read_raw(key: &str) -> Result<Option<String>, PersistenceError> {
    local_storage()?
        .get_item(key)
        .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))
}

#[cfg(target_arch = "wasm32")]
fn write_raw(key: &str, json: &str) -> Result<(), PersistenceError> {
    local_storage()?
        .set_item(key, json)
        .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))
}

/// Directory holding native save files
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_raw(key: &str) -> Result<Option<String>, PersistenceError> {
    read_raw_at(&data_dir(), key)
}

#[cfg(not(target_arch = "wasm32"))]
fn write_raw(key: &str, json: &str) -> Result<(), PersistenceError> {
    write_raw_at(&data_dir(), key, json)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_raw_at(dir: &Path, key: &str) -> Result<Option<String>, PersistenceError> {
    match std::fs::read_to_string(dir.join(format!("{}.json", key))) {
        Ok(json) => Ok(Some(json)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_raw_at(dir: &Path, key: &str, json: &str) -> Result<(), PersistenceError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", key));
    // Write to a temp file first so a crash never leaves half a save
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        best: u64,
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("road-dodge-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_missing_key_reads_none() {
        let dir = scratch_dir("missing");
        assert!(read_raw_at(&dir, "nothing").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_creates_dir() {
        let dir = scratch_dir("write");
        let json = serde_json::to_string(&Sample { best: 42 }).unwrap();
        write_raw_at(&dir, "sample", &json).unwrap();

        let stored = read_raw_at(&dir, "sample").unwrap().unwrap();
        let sample: Sample = serde_json::from_str(&stored).unwrap();
        assert_eq!(sample, Sample { best: 42 });
        assert!(!dir.join("sample.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_value_is_a_json_error() {
        let dir = scratch_dir("corrupt");
        write_raw_at(&dir, "broken", "{ not json").unwrap();
        let raw = read_raw_at(&dir, "broken").unwrap().unwrap();
        let err = PersistenceError::from(serde_json::from_str::<Sample>(&raw).unwrap_err());
        assert!(matches!(err, PersistenceError::Json(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
