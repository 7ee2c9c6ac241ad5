//! Cache facade behaviour through the client

use crate::integration::mock_server::{destinations, origins, MockServerFixture, OK_BODY};
use distance_matrix::cache::MemoryCache;
use distance_matrix::{DistanceMatrixClient, Mode, Place};
use std::sync::Arc;

#[tokio::test]
async fn test_repeated_requests_are_served_from_cache() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_response(200, OK_BODY, 1).await;
    let config = fixture.configuration().with_cache(Arc::new(MemoryCache::new(16)));
    let client = DistanceMatrixClient::new(config);

    let first = client.fetch_json(&origins(), &destinations()).await.unwrap();
    let second = client.fetch_json(&origins(), &destinations()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    let stats = client.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.sets, 1);
}

#[tokio::test]
async fn test_concurrent_requests_fetch_once() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_response(200, OK_BODY, 1).await;
    let config = fixture.configuration().with_cache(Arc::new(MemoryCache::new(16)));
    let client = Arc::new(DistanceMatrixClient::new(config));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.fetch_json(&origins(), &destinations()).await
        }));
    }
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert_eq!(value["status"], "OK");
    }

    mock.assert_async().await;
    let stats = client.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_response(500, "oops", 2).await;
    let config = fixture.configuration().with_cache(Arc::new(MemoryCache::new(16)));
    let client = DistanceMatrixClient::new(config);

    assert!(client.fetch_json(&origins(), &destinations()).await.is_err());
    assert!(client.fetch_json(&origins(), &destinations()).await.is_err());

    mock.assert_async().await;
    assert_eq!(client.cache_stats().sets, 0);
}

#[tokio::test]
async fn test_different_requests_use_different_entries() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_response(200, OK_BODY, 2).await;
    let backend = Arc::new(MemoryCache::new(16));
    let walking = DistanceMatrixClient::new(
        fixture
            .configuration()
            .with_mode(Mode::Walking)
            .with_cache(backend.clone()),
    );
    let driving = DistanceMatrixClient::new(fixture.configuration().with_cache(backend.clone()));

    walking.fetch_json(&origins(), &destinations()).await.unwrap();
    driving.fetch_json(&origins(), &destinations()).await.unwrap();
    // Same request as the first one: served from the shared backend.
    walking
        .fetch_json(&origins(), &[Place::from("Bergen, Norway")])
        .await
        .unwrap();

    mock.assert_async().await;
}
