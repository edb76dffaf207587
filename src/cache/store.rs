// Cache store for reading and writing cached data.
// Handles the entry format, TTL checking, and the file and memory backends.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{GatewayError, Result};

use super::paths;

/// Default freshness window: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Wrapper for cached data with the time it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached, as epoch milliseconds on disk.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }

    /// Time since the entry was written. Entries dated in the future count as infinitely old.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.timestamp)
            .to_std()
            .unwrap_or(Duration::MAX)
    }

    /// Check if this cached data is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Key-value storage for serialized cache entries.
pub trait CacheStore: Send + Sync {
    /// Raw contents stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the contents stored under `key`.
    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// Store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store scoped to one GitHub user under a cache root.
    pub fn for_user(root: &Path, login: &str) -> Self {
        Self::new(paths::user_dir(root, login))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CacheStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        read_text(&paths::entry_path(&self.dir, key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        write_text(&paths::entry_path(&self.dir, key), contents)
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| GatewayError::Other("cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| GatewayError::Other("cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

/// Read and decode the entry under `key`. Malformed JSON is reported as `CacheCorrupt`.
pub fn read_cached<T: DeserializeOwned>(
    store: &dyn CacheStore,
    key: &str,
) -> Result<Option<CachedData<T>>> {
    let Some(contents) = store.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| GatewayError::CacheCorrupt {
            key: key.to_string(),
            source,
        })
}

/// Write data under `key`, stamped with the current time.
pub fn write_cached<T: Serialize>(store: &dyn CacheStore, key: &str, data: &T) -> Result<()> {
    let cached = CachedData::new(data);
    let json = serde_json::to_string(&cached)?;
    store.write(key, &json)
}

/// Write text to a file atomically via a temp file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let written = write_synced(&temp_path, text).and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    Ok(())
}

fn write_synced(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}

/// Read a cache file. A missing file is `None`, any other failure an error.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[test]
    fn test_write_and_read_cached_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::for_user(temp_dir.path(), "octo");

        write_cached(&store, "profile", &sample()).unwrap();

        let cached: Option<CachedData<TestData>> = read_cached(&store, "profile").unwrap();
        let cached = cached.unwrap();
        assert_eq!(cached.data, sample());
        assert!(cached.is_fresh(DEFAULT_TTL));
        assert!(store.dir().join("profile.json").exists());
    }

    #[test]
    fn test_timestamp_is_epoch_millis() {
        let store = MemoryStore::new();
        let before = Utc::now().timestamp_millis();

        write_cached(&store, "repos", &vec![1, 2, 3]).unwrap();

        let raw = store.read("repos").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let timestamp = value["timestamp"].as_i64().unwrap();
        assert!(timestamp >= before);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut data = CachedData::new("test");

        data.timestamp = Utc::now() - chrono::Duration::seconds(2 * 60 * 60);

        assert!(!data.is_fresh(DEFAULT_TTL));
        assert!(data.is_fresh(Duration::from_secs(3 * 60 * 60)));
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let mut data = CachedData::new("test");
        data.timestamp = Utc::now() + chrono::Duration::seconds(600);

        assert!(!data.is_fresh(DEFAULT_TTL));
    }

    #[test]
    fn test_corrupt_entry_reports_key() {
        let store = MemoryStore::new();
        store.write("releases", "{not json").unwrap();

        let err = read_cached::<Vec<u32>>(&store, "releases").unwrap_err();
        assert!(matches!(err, GatewayError::CacheCorrupt { ref key, .. } if key == "releases"));
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let cached: Option<CachedData<TestData>> = read_cached(&store, "missing").unwrap();
        assert!(cached.is_none());

        let text = read_text(&temp_dir.path().join("missing.json")).unwrap();
        assert!(text.is_none());
    }

    #[test]
    fn test_unreadable_entry_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        fs::create_dir(temp_dir.path().join("profile.json")).unwrap();

        assert!(matches!(store.read("profile"), Err(GatewayError::Io(_))));
    }

    #[test]
    fn test_write_replaces_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("repos.json");

        write_text(&path, "first").unwrap();
        write_text(&path, "second").unwrap();

        assert_eq!(read_text(&path).unwrap().as_deref(), Some("second"));
        assert!(!path.with_extension("tmp").exists());
    }
}
