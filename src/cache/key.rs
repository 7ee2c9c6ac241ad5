//! Cache key derivation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::sync::Arc;

/// Pure function mapping a canonical request string to a stable digest.
pub type CacheKeyTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

static DEFAULT_TRANSFORM: Lazy<CacheKeyTransform> = Lazy::new(|| {
    let transform: CacheKeyTransform = Arc::new(sha512_hex);
    transform
});

/// The transform used when none is configured: lowercase hex SHA-512.
pub fn default_cache_key_transform() -> CacheKeyTransform {
    DEFAULT_TRANSFORM.clone()
}

pub fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Apply `transform` to a canonical request string.
    pub fn derive(canonical: &str, transform: &CacheKeyTransform) -> Self {
        Self::new(transform(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
