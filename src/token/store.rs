//! Persistent key-value storage for tokens.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::error::ClientError;

/// Key-value storage a token provider reads from.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: DashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.inner.insert(key.to_string(), value.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.inner.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file (`{"token": "..."}`).
///
/// The file is re-read on every lookup so tokens written by another process
/// are picked up without restarting.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let file = File::open(&self.path).map_err(|e| ClientError::TokenStore(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ClientError::TokenStore(e.to_string()))
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), ClientError> {
        let file = File::create(&self.path).map_err(|e| ClientError::TokenStore(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), map).map_err(|e| ClientError::TokenStore(e.to_string()))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read token store, treating token as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_entry("token", "abc");
        assert_eq!(store.get("token").as_deref(), Some("abc"));
        store.remove("token").unwrap();
        assert!(store.get("token").is_none());
    }

    #[test]
    fn test_file_store_persistence() {
        let path = std::env::temp_dir().join(format!("nreq-token-{}.json", uuid::Uuid::new_v4()));
        let store = FileTokenStore::new(&path);
        assert!(store.get("token").is_none());

        store.set("token", "t-123").unwrap();
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get("token").as_deref(), Some("t-123"));

        reopened.remove("token").unwrap();
        assert!(store.get("token").is_none());

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_absent() {
        let path = std::env::temp_dir().join(format!("nreq-token-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();
        let store = FileTokenStore::new(&path);
        assert!(store.get("token").is_none());
        assert!(store.set("token", "x").is_err());
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
