//! Response caching: identical requests are answered from storage.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ClientCache`] | Facade with per-key fetch deduplication and statistics |
//! | [`CacheBackend`] | Trait for storage collaborators |
//! | [`MemoryCache`] | Bounded in-memory LRU backend with optional TTL |
//! | [`NullCache`] | Backend that stores nothing |
//! | [`CacheKey`] | Digest of a canonical request URL |
//!
//! Keys are derived by applying the configured
//! [`cache_key_transform`](crate::configuration::Configuration::cache_key_transform)
//! (SHA-512 by default) to the final request URL, so equal configurations and
//! equal endpoints always map to the same entry.
//!
//! ## Example
//!
//! ```rust
//! use distance_matrix::cache::{CacheBackend, MemoryCache};
//! use distance_matrix::configuration::Configuration;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let backend: Arc<dyn CacheBackend> =
//!     Arc::new(MemoryCache::new(1000).with_ttl(Duration::from_secs(3600)));
//! let config = Configuration::default().with_cache(backend);
//! assert!(config.cache.is_some());
//! ```

mod backend;
mod key;
mod manager;

pub use backend::{CacheBackend, MemoryCache, NullCache};
pub use key::{default_cache_key_transform, sha512_hex, CacheKey, CacheKeyTransform};
pub use manager::{CacheStats, ClientCache};
