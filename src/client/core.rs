use crate::cache::{CacheStats, ClientCache};
use crate::configuration::Configuration;
use crate::places::Place;
use crate::request::{RequestDescriptor, UrlBuilder};
use crate::telemetry::Payload;
use crate::transport::HttpTransport;
use crate::types::MatrixData;
use crate::Result;
use serde_json::Value;

/// Distance matrix client.
///
/// Each call builds a fresh request from the configuration, answers it from
/// the cache when possible and otherwise executes it over HTTP. Concurrent
/// calls for the same request share one upstream fetch when a cache backend
/// is configured.
pub struct DistanceMatrixClient {
    configuration: Configuration,
    cache: ClientCache,
    transport: HttpTransport,
}

impl DistanceMatrixClient {
    pub fn new(configuration: Configuration) -> Self {
        let cache = ClientCache::new(configuration.cache.clone());
        Self {
            configuration,
            cache,
            transport: HttpTransport::new(),
        }
    }

    /// Client configured from `DISTANCE_MATRIX_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(Configuration::from_env())
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Build the request for `origins` x `destinations` without sending it.
    pub fn request(&self, origins: &[Place], destinations: &[Place]) -> Result<RequestDescriptor> {
        UrlBuilder::new(&self.configuration).build(origins, destinations)
    }

    /// Raw JSON body of a successful response.
    pub async fn fetch_json(&self, origins: &[Place], destinations: &[Place]) -> Result<Value> {
        self.fetch_json_with_payload(origins, destinations, Payload::new())
            .await
    }

    /// As [`fetch_json`](Self::fetch_json), attaching `payload` to the
    /// instrumentation event. Cache hits emit no event.
    pub async fn fetch_json_with_payload(
        &self,
        origins: &[Place],
        destinations: &[Place],
        payload: Payload,
    ) -> Result<Value> {
        let request = self.request(origins, destinations)?;
        self.cache
            .fetch(request.cache_key(), || {
                self.transport
                    .execute(&request, &self.configuration, payload)
            })
            .await
    }

    pub async fn fetch(&self, origins: &[Place], destinations: &[Place]) -> Result<MatrixData> {
        let value = self.fetch_json(origins, destinations).await?;
        MatrixData::from_value(value)
    }
}

impl std::fmt::Debug for DistanceMatrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrixClient")
            .field("configuration", &self.configuration)
            .field("cache", &self.cache.backend_name())
            .finish()
    }
}
