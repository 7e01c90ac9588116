//! Enrichment response cache (§4.13, §6.1): a concurrent map keyed by
//! `canonical({endpoint, params})` with per-key single-flight semantics —
//! one outstanding fetch per cache key, others block on the same key's
//! lock and observe its result rather than issuing a redundant call.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value as Json;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry {
    value: Json,
    expires_at: Instant,
}

#[derive(Default)]
pub struct EnrichmentCache {
    entries: DashMap<String, Entry>,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&self, key: &str) -> Option<Json> {
        self.entries.get(key).and_then(|entry| (entry.expires_at > Instant::now()).then(|| entry.value.clone()))
    }

    /// Returns the cached value for `key` if fresh; otherwise calls
    /// `fetch` under a per-key lock (rechecking freshness after acquiring
    /// it, so only the first caller for a given key actually fetches) and
    /// caches the result for `ttl`.
    pub fn get_or_fetch(&self, key: &str, ttl: Duration, fetch: impl FnOnce() -> Json) -> Json {
        if let Some(value) = self.fresh(key) {
            return value;
        }
        let lock = self.inflight.entry(key.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone();
        let _guard = lock.lock();
        if let Some(value) = self.fresh(key) {
            return value;
        }
        let value = fetch();
        self.entries.insert(key.to_string(), Entry { value: value.clone(), expires_at: Instant::now() + ttl });
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn repeated_calls_within_ttl_do_not_refetch() {
        let cache = EnrichmentCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..5 {
            cache.get_or_fetch("key", Duration::from_secs(60), || {
                calls.fetch_add(1, Ordering::SeqCst);
                json!({"score": 42})
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_entry_triggers_refetch() {
        let cache = EnrichmentCache::new();
        cache.get_or_fetch("key", Duration::from_millis(1), || json!({"score": 1}));
        std::thread::sleep(Duration::from_millis(5));
        let value = cache.get_or_fetch("key", Duration::from_secs(60), || json!({"score": 2}));
        assert_eq!(value, json!({"score": 2}));
    }
}
