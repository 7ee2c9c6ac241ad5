//! One instrumentation event per request attempt

use crate::integration::mock_server::{destinations, origins, MockServerFixture, OK_BODY};
use distance_matrix::cache::MemoryCache;
use distance_matrix::telemetry::{InMemorySink, Payload, REQUEST_EVENT};
use distance_matrix::DistanceMatrixClient;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_success_emits_one_event_with_payload() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(200, OK_BODY, 1).await;
    let sink = Arc::new(InMemorySink::default());
    let client = DistanceMatrixClient::new(fixture.configuration().with_instrumentation(sink.clone()));

    let mut payload = Payload::new();
    payload.insert("request_id".to_string(), json!("abc-123"));
    client
        .fetch_json_with_payload(&origins(), &destinations(), payload.clone())
        .await
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, REQUEST_EVENT);
    assert_eq!(events[0].outcome, "success");
    assert_eq!(events[0].http_status, Some(200));
    assert_eq!(events[0].payload, payload);
    assert!(events[0].started_at > 0.0);
}

#[tokio::test]
async fn test_failure_emits_one_event() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(503, "unavailable", 1).await;
    let sink = Arc::new(InMemorySink::default());
    let client = DistanceMatrixClient::new(fixture.configuration().with_instrumentation(sink.clone()));

    assert!(client.fetch_json(&origins(), &destinations()).await.is_err());

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, "server_error");
    assert_eq!(events[0].http_status, Some(503));
}

#[tokio::test]
async fn test_cache_hits_emit_no_event() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(200, OK_BODY, 1).await;
    let sink = Arc::new(InMemorySink::default());
    let config = fixture
        .configuration()
        .with_cache(Arc::new(MemoryCache::new(16)))
        .with_instrumentation(sink.clone());
    let client = DistanceMatrixClient::new(config);

    for _ in 0..3 {
        client.fetch_json(&origins(), &destinations()).await.unwrap();
    }
    assert_eq!(sink.len(), 1);
}
