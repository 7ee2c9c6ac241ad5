//! Mock HTTP server setup for integration tests

use distance_matrix::request::BASE_PATH;
use distance_matrix::{Configuration, Place, Protocol};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const OK_BODY: &str = r#"{
  "status": "OK",
  "origin_addresses": ["Oslo, Norway"],
  "destination_addresses": ["Bergen, Norway"],
  "rows": [{"elements": [{
    "status": "OK",
    "distance": {"text": "463 km", "value": 463000},
    "duration": {"text": "6 hours 51 mins", "value": 24660}
  }]}]
}"#;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    /// Configuration pointing at the mock server over plain HTTP.
    pub fn configuration(&self) -> Configuration {
        Configuration::default()
            .with_protocol(Protocol::Http)
            .with_host(self.server.host_with_port())
    }

    /// Mock the endpoint with a fixed status and body, expecting `hits` calls.
    pub async fn mock_response(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", Matcher::Regex(format!("^{}", BASE_PATH)))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }
}

pub fn origins() -> Vec<Place> {
    vec![Place::from("Oslo, Norway")]
}

pub fn destinations() -> Vec<Place> {
    vec![Place::from("Bergen, Norway")]
}
