use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use redis::Commands;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Raw string key-value persistence. Any store that can get, set and remove a
/// string under a key can back the cache.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-process map
// ────────────────────────────────────────────────────────────────────────────

/// Entries older than `max_age` are swept on every write, so keys that are
/// never read again do not accumulate.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    max_age: Option<Duration>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            entries: Mutex::default(),
            max_age: Some(max_age),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        if let Some(max_age) = self.max_age {
            entries.retain(|_, (_, written_at)| written_at.elapsed() < max_age);
        }
        entries.insert(key.to_string(), (value.to_string(), Instant::now()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// One file per key
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    /// Percent-encodes the key, which is reversible, so distinct keys never
    /// share a file and separators like `/` cannot escape the directory.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl CacheBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis strings
// ────────────────────────────────────────────────────────────────────────────

/// Redis-backed store. Opens a short-lived synchronous connection per call;
/// callers on the async runtime go through `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct RedisBackend {
    client: redis::Client,
    prefix: String,
}

impl RedisBackend {
    pub fn new(client: redis::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl CacheBackend for RedisBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_connection()?;
        let value: Option<String> = conn.get(self.namespaced(key))?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_connection()?;
        conn.set::<_, _, ()>(self.namespaced(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_connection()?;
        conn.del::<_, ()>(self.namespaced(key))?;
        Ok(())
    }
}
