use crate::cache::Clock;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Short-lived read-side cache. Never authoritative: entries bound staleness
/// by TTL, the protocol layer invalidates explicitly after every mutation,
/// and dropping the whole map at any point is always correct.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Returns the cached value unless it is absent or older than the TTL.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.clock.now().duration_since(entry.stored_at) < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: self.clock.now(),
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache(ttl_secs: u64) -> (TtlCache<u32, String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::new(Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn serves_within_ttl_and_expires_after() {
        let (cache, clock) = cache(120);
        cache.insert(1, "one".to_owned());

        clock.advance(Duration::from_secs(119));
        assert_eq!(cache.get(&1), Some("one".to_owned()));

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn invalidate_takes_effect_before_expiry() {
        let (cache, _clock) = cache(120);
        cache.insert(1, "one".to_owned());
        cache.invalidate(&1);
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn insert_refreshes_age() {
        let (cache, clock) = cache(120);
        cache.insert(1, "old".to_owned());
        clock.advance(Duration::from_secs(100));
        cache.insert(1, "new".to_owned());
        clock.advance(Duration::from_secs(100));
        assert_eq!(cache.get(&1), Some("new".to_owned()));
    }
}
