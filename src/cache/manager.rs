//! Cache facade: serve identical requests from storage, fetching at most once per key.

use super::backend::CacheBackend;
use super::key::CacheKey;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// Optional pass-through in front of the transport.
///
/// With no backend every [`ClientCache::fetch`] simply runs `compute`. With a
/// backend, concurrent fetches for one key are serialized on a per-key lock
/// and re-check storage after acquiring it, so a key is computed at most once
/// while its first computation is in flight. Only successful results are
/// stored. Storage failures are logged and treated as misses; they never fail
/// the request.
pub struct ClientCache {
    backend: Option<Arc<dyn CacheBackend>>,
    inflight: Mutex<HashMap<String, KeyLock>>,
    stats: AtomicStats,
}

impl ClientCache {
    pub fn new(backend: Option<Arc<dyn CacheBackend>>) -> Self {
        Self {
            backend,
            inflight: Mutex::new(HashMap::new()),
            stats: AtomicStats::default(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub async fn fetch<F, Fut>(&self, key: &CacheKey, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let backend = match &self.backend {
            Some(b) => b.clone(),
            None => return compute().await,
        };

        if let Some(value) = self.lookup(backend.as_ref(), key).await {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(cache_key = key.as_str(), backend = backend.name(), "cache hit");
            return Ok(value);
        }

        let lock = self.key_lock(key);
        let result = {
            let _guard = lock.lock().await;
            // Another task may have filled the entry while we waited.
            if let Some(value) = self.lookup(backend.as_ref(), key).await {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(cache_key = key.as_str(), "cache filled by concurrent fetch");
                Ok(value)
            } else {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(cache_key = key.as_str(), backend = backend.name(), "cache miss");
                let computed = compute().await;
                if let Ok(value) = &computed {
                    self.store(backend.as_ref(), key, value).await;
                }
                computed
            }
        };
        self.release_key_lock(key, lock);
        result
    }

    async fn lookup(&self, backend: &dyn CacheBackend, key: &CacheKey) -> Option<Value> {
        match backend.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    self.stats.errors.fetch_add(1, Ordering::Relaxed);
                    warn!(cache_key = key.as_str(), error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(cache_key = key.as_str(), error = %e, "cache read failed");
                None
            }
        }
    }

    async fn store(&self, backend: &dyn CacheBackend, key: &CacheKey, value: &Value) {
        let bytes = match serde_json::to_vec(value) {
            Ok(b) => b,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(cache_key = key.as_str(), error = %e, "cache value not serializable");
                return;
            }
        };
        match backend.set(key, &bytes).await {
            Ok(()) => {
                self.stats.sets.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(cache_key = key.as_str(), error = %e, "cache write failed");
            }
        }
    }

    fn key_lock(&self, key: &CacheKey) -> KeyLock {
        let mut inflight = self.inflight.lock().unwrap_or_else(|p| p.into_inner());
        inflight
            .entry(key.hash.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn release_key_lock(&self, key: &CacheKey, lock: KeyLock) {
        let mut inflight = self.inflight.lock().unwrap_or_else(|p| p.into_inner());
        // Only the table and this caller hold the lock: nobody else is waiting on it.
        if Arc::strong_count(&lock) == 2 {
            inflight.remove(&key.hash);
        }
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inflight.lock().map(|m| m.len()).unwrap_or(0)
    }
}
