//! Response classification through the full client pipeline

use crate::integration::mock_server::{destinations, origins, MockServerFixture, OK_BODY};
use distance_matrix::types::ElementStatus;
use distance_matrix::{DistanceMatrixClient, Error, UpstreamStatus};

#[tokio::test]
async fn test_success_returns_parsed_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_response(200, OK_BODY, 1).await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let data = client.fetch(&origins(), &destinations()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(data.origin_addresses, vec!["Oslo, Norway"]);
    let element = data.element(0, 0).unwrap();
    assert_eq!(element.status, ElementStatus::Ok);
    assert_eq!(element.distance.as_ref().unwrap().value, 463000);
}

#[tokio::test]
async fn test_uri_too_long_is_request_too_large() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(414, "", 1).await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    match err {
        Error::RequestTooLarge { url, max_size } => {
            assert!(url.contains("origins=Oslo%2C+Norway"));
            assert_eq!(max_size, 8192);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_request_is_client_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(400, "bad request", 1).await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert!(!err.is_retryable());
    match err {
        Error::Client {
            http_status, body, ..
        } => {
            assert_eq!(http_status, 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_internal_error_is_server_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(500, "oops", 1).await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.http_status(), Some(500));
}

#[tokio::test]
async fn test_embedded_status_is_client_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_response(200, r#"{"status":"OVER_QUERY_LIMIT","rows":[]}"#, 1)
        .await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(UpstreamStatus::OverQueryLimit));
    assert_eq!(err.http_status(), Some(200));
    assert_eq!(
        err.to_string(),
        "Client error: HTTP 200 with upstream status OVER_QUERY_LIMIT"
    );
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_response(302, "", 1).await;
    let client = DistanceMatrixClient::new(fixture.configuration());

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert!(matches!(err, Error::Server { http_status: Some(302), .. }));
}
