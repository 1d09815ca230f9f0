// List cache with a fixed TTL over a pluggable key-value backend.
// A miss is never an error: corrupt, expired and unreachable entries all read
// as absent, and failed writes only cost a refetch later.

pub mod backend;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

pub use backend::{CacheBackend, FileBackend, MemoryBackend, RedisBackend};

pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wire shape of a stored entry. The timestamp is epoch milliseconds.
#[derive(Serialize, Deserialize)]
struct CacheEntry<D> {
    data: D,
    timestamp: i64,
}

pub struct LocalCache {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl LocalCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self::with_clock(backend, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        backend: Arc<dyn CacheBackend>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            clock,
            ttl,
        }
    }

    /// Returns the cached list while it is fresh. Anything else (missing,
    /// unparseable, expired) returns `None` and removes the stored entry.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for '{key}': {e}");
                return None;
            }
        };

        let entry: CacheEntry<Vec<T>> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding corrupt cache entry '{key}': {e}");
                self.clear(key);
                return None;
            }
        };

        let age = self.clock.now().timestamp_millis() - entry.timestamp;
        if age >= self.ttl.num_milliseconds() {
            debug!("Cache entry '{key}' expired ({age}ms old)");
            self.clear(key);
            return None;
        }

        debug!("Cache hit for '{key}' ({} records)", entry.data.len());
        Some(entry.data)
    }

    /// Stores `data` stamped with the current time, replacing any prior entry.
    pub fn write<T: Serialize>(&self, key: &str, data: &[T]) {
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now().timestamp_millis(),
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize cache entry '{key}': {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set(key, &raw) {
            warn!("Cache write failed for '{key}': {e}");
        }
    }

    pub fn clear(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!("Cache clear failed for '{key}': {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::CacheError;
    use std::sync::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Backend whose writes always fail, like a full browser quota.
    struct FullBackend;

    impl CacheBackend for FullBackend {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }
        fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
    }

    fn setup() -> (LocalCache, Arc<MemoryBackend>, Arc<ManualClock>) {
        let backend = Arc::new(MemoryBackend::new());
        let clock = ManualClock::new();
        let cache = LocalCache::with_clock(
            backend.clone(),
            Duration::seconds(DEFAULT_TTL_SECS),
            clock.clone(),
        );
        (cache, backend, clock)
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let (cache, _, clock) = setup();
        let data = vec!["alice".to_string(), "bob".to_string()];
        cache.write("k", &data);
        assert_eq!(cache.read::<String>("k"), Some(data.clone()));

        clock.advance(Duration::seconds(DEFAULT_TTL_SECS - 1));
        assert_eq!(cache.read::<String>("k"), Some(data));
    }

    #[test]
    fn test_expired_entry_is_cleared() {
        let (cache, backend, clock) = setup();
        cache.write("k", &[1, 2, 3]);

        clock.advance(Duration::seconds(DEFAULT_TTL_SECS + 1));
        assert_eq!(cache.read::<i32>("k"), None);
        assert_eq!(backend.get("k").unwrap(), None);
        assert_eq!(cache.read::<i32>("k"), None);
    }

    #[test]
    fn test_entry_exactly_at_ttl_is_stale() {
        let (cache, _, clock) = setup();
        cache.write("k", &[1]);
        clock.advance(Duration::seconds(DEFAULT_TTL_SECS));
        assert_eq!(cache.read::<i32>("k"), None);
    }

    #[test]
    fn test_missing_key_is_absent() {
        let (cache, _, _) = setup();
        assert_eq!(cache.read::<i32>("nope"), None);
    }

    #[test]
    fn test_corrupt_entry_is_cleared() {
        let (cache, backend, _) = setup();
        backend.set("k", "{not json").unwrap();
        assert_eq!(cache.read::<i32>("k"), None);
        assert_eq!(backend.get("k").unwrap(), None);
    }

    #[test]
    fn test_wrong_shape_is_treated_as_corrupt() {
        let (cache, backend, _) = setup();
        backend.set("k", r#"{"data": "oops", "timestamp": 0}"#).unwrap();
        assert_eq!(cache.read::<i32>("k"), None);
        assert_eq!(backend.get("k").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_wholesale() {
        let (cache, _, _) = setup();
        cache.write("k", &[1, 2, 3]);
        cache.write("k", &[9]);
        assert_eq!(cache.read::<i32>("k"), Some(vec![9]));
    }

    #[test]
    fn test_rewrite_resets_timestamp() {
        let (cache, _, clock) = setup();
        cache.write("k", &[1]);
        clock.advance(Duration::seconds(DEFAULT_TTL_SECS - 10));
        cache.write("k", &[2]);
        clock.advance(Duration::seconds(20));
        assert_eq!(cache.read::<i32>("k"), Some(vec![2]));
    }

    #[test]
    fn test_clear_invalidates() {
        let (cache, _, _) = setup();
        cache.write("k", &[1]);
        cache.clear("k");
        assert_eq!(cache.read::<i32>("k"), None);
    }

    #[test]
    fn test_failed_write_is_swallowed() {
        let cache = LocalCache::new(Arc::new(FullBackend), Duration::seconds(DEFAULT_TTL_SECS));
        cache.write("k", &[1, 2]);
        assert_eq!(cache.read::<i32>("k"), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let (cache, _, _) = setup();
        cache.write("a", &[1]);
        cache.write("b", &[2]);
        cache.clear("a");
        assert_eq!(cache.read::<i32>("a"), None);
        assert_eq!(cache.read::<i32>("b"), Some(vec![2]));
    }
}
