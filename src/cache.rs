use dashmap::DashMap;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Default entry lifetime for the process-wide data cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60); // 5 minutes

#[derive(Clone)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// String-keyed store with per-entry expiry. An entry is valid iff its age
/// is below the TTL fixed at construction; stale entries are treated as
/// absent and evicted lazily on the next access. There is no background
/// sweep.
pub struct TtlCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let stale = match self.entries.get(key) {
            Some(entry) => {
                if entry.created_at.elapsed() < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };
        if stale {
            // remove_if so a concurrent fresh set() of the same key survives
            self.entries
                .remove_if(key, |_, entry| entry.created_at.elapsed() >= self.ttl);
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: T) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Counts raw entries; lazily-evicted stale entries may still appear
    /// until the next `get` touches them.
    pub fn stats(&self) -> CacheStats {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_get_returns_stored_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("websites", 42);
        assert_eq!(cache.get("websites"), Some(42));
    }

    #[test]
    fn test_get_missing_key() {
        let cache: TtlCache<i32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_set_overwrites_value_and_timestamp() {
        let cache = TtlCache::new(Duration::from_millis(50));
        cache.set("key", 1);
        sleep(Duration::from_millis(30));
        cache.set("key", 2);
        sleep(Duration::from_millis(30));
        // 60ms after the first set, but only 30ms after the overwrite
        assert_eq!(cache.get("key"), Some(2));
    }

    #[test]
    fn test_expired_entry_is_absent() {
        let cache = TtlCache::new(Duration::from_millis(20));
        cache.set("key", 1);
        sleep(Duration::from_millis(30));
        assert_eq!(cache.get("key"), None);
        // lazily evicted by the failed get
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_stats_reports_keys() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("websites", 1);
        cache.set("asset_metadata", 2);
        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert!(stats.keys.contains(&"websites".to_string()));
        assert!(stats.keys.contains(&"asset_metadata".to_string()));
    }
}
