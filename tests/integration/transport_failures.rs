//! Failures below the HTTP status line

use crate::integration::mock_server::{destinations, origins};
use distance_matrix::{Configuration, DistanceMatrixClient, Error, Protocol};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_read_timeout_is_server_error() {
    // Accept connections and never answer.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = Configuration::default()
        .with_protocol(Protocol::Http)
        .with_host(addr.to_string())
        .with_timeouts(Some(1.0), Some(0.2), None);
    let client = DistanceMatrixClient::new(config);

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert!(err.is_retryable());
    match err {
        Error::Server {
            http_status: None,
            message,
        } => assert!(message.starts_with("request timed out"), "{}", message),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_connection_is_server_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Configuration::default()
        .with_protocol(Protocol::Http)
        .with_host(addr.to_string());
    let client = DistanceMatrixClient::new(config);

    let err = client.fetch_json(&origins(), &destinations()).await.unwrap_err();
    assert!(matches!(err, Error::Server { http_status: None, .. }));
}
