//! Integration tests with mock HTTP server

pub mod cache;
pub mod classification;
pub mod instrumentation;
pub mod mock_server;
pub mod transport_failures;
