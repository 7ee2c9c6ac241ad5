//! Request building: configuration + endpoints -> canonical, size-bounded URL.

pub mod signer;

use crate::cache::CacheKey;
use crate::configuration::Configuration;
use crate::places::{encode_places, Place};
use crate::{Error, Result};
use url::form_urlencoded;

/// Path of the JSON endpoint on the upstream host.
pub const BASE_PATH: &str = "/maps/api/distancematrix/json";

/// Longest URL the upstream service accepts.
pub const MAX_URL_SIZE: usize = 8192;

/// A request ready to execute: final URL plus the key it is cached under.
///
/// Built fresh for every call and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: String,
    cache_key: CacheKey,
}

impl RequestDescriptor {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_key(&self) -> &CacheKey {
        &self.cache_key
    }
}

/// Builds [`RequestDescriptor`]s from a borrowed configuration.
///
/// The borrow keeps the configuration frozen for the duration of a build.
pub struct UrlBuilder<'a> {
    configuration: &'a Configuration,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(configuration: &'a Configuration) -> Self {
        Self { configuration }
    }

    /// Query parameters in emission order: configuration first, then endpoints.
    pub fn params(&self, origins: &[Place], destinations: &[Place]) -> Result<Vec<(String, String)>> {
        let config = self.configuration;
        let mut params: Vec<(String, String)> = config.to_param().into_iter().collect();
        params.push((
            "origins".to_string(),
            encode_places("origins", origins, config.lat_lng_scale, config.use_encoded_polylines)?,
        ));
        params.push((
            "destinations".to_string(),
            encode_places(
                "destinations",
                destinations,
                config.lat_lng_scale,
                config.use_encoded_polylines,
            )?,
        ));
        Ok(params)
    }

    /// Validate, encode, sign and size-check.
    ///
    /// Fails with [`Error::Validation`] for an invalid configuration or endpoint
    /// list and with [`Error::RequestTooLarge`] when the final URL exceeds
    /// [`MAX_URL_SIZE`]. Never touches the network.
    pub fn build(&self, origins: &[Place], destinations: &[Place]) -> Result<RequestDescriptor> {
        let config = self.configuration;
        config.validate()?;

        let params = self.params(origins, destinations)?;
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        let mut path_and_query = format!("{}?{}", BASE_PATH, query);
        if let Some(key) = config.signing_key() {
            path_and_query = signer::sign(&path_and_query, key)?;
        }

        let url = format!("{}://{}{}", config.protocol, config.host, path_and_query);
        if url.len() > MAX_URL_SIZE {
            return Err(Error::RequestTooLarge {
                url,
                max_size: MAX_URL_SIZE,
            });
        }

        let cache_key = CacheKey::derive(&url, &config.cache_key_transform);
        Ok(RequestDescriptor { url, cache_key })
    }
}
