//! # distance-matrix
//!
//! Client for the Google Distance Matrix API: validated configuration,
//! deterministic request URLs, response classification and an optional
//! deduplicating response cache.
//!
//! ## Overview
//!
//! A request flows through four stages:
//!
//! 1. [`Configuration`] holds independently validated attributes with defaults.
//! 2. [`request::UrlBuilder`] turns a valid configuration plus origin and
//!    destination [`Place`]s into a signed, size-checked URL and its cache key.
//! 3. [`cache::ClientCache`] answers repeated requests from storage and lets at
//!    most one caller fetch a given key at a time.
//! 4. [`transport::HttpTransport`] performs the GET, classifies the response
//!    and reports one instrumentation event per attempt.
//!
//! Every failure surfaces as one [`Error`] variant. Only [`Error::Server`] is
//! worth retrying, and retries are left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use distance_matrix::{Configuration, DistanceMatrixClient, Mode, Place};
//!
//! #[tokio::main]
//! async fn main() -> distance_matrix::Result<()> {
//!     let config = Configuration::default()
//!         .with_mode(Mode::Walking)
//!         .with_api_key("your-api-key");
//!     let client = DistanceMatrixClient::new(config);
//!
//!     let data = client
//!         .fetch(&[Place::from("Oslo, Norway")], &[Place::lat_lng(60.39, 5.32)])
//!         .await?;
//!     for (origin, destination, element) in data.pairs() {
//!         println!("{origin} -> {destination}: {:?}", element.distance);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`configuration`] | Attributes, defaults, validation, serialization |
//! | [`places`] | Origins and destinations, polyline encoding |
//! | [`request`] | URL building and signing |
//! | [`transport`] | HTTP execution and response classification |
//! | [`cache`] | Cache facade and backends |
//! | [`telemetry`] | Instrumentation events and sinks |
//! | [`types`] | Typed response data |
//! | [`client`] | The [`DistanceMatrixClient`] facade |

pub mod cache;
pub mod client;
pub mod configuration;
pub mod places;
pub mod request;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::DistanceMatrixClient;
pub use configuration::{
    Avoid, Configuration, Mode, Protocol, TimeValue, TrafficModel, TransitMode,
    TransitRoutingPreference, Units,
};
pub use places::Place;
pub use request::RequestDescriptor;
pub use transport::{Classification, UpstreamStatus};
pub use types::MatrixData;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
