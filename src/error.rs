use crate::configuration::ValidationErrors;
use crate::transport::UpstreamStatus;
use thiserror::Error;

/// Unified error type for the distance matrix client.
///
/// Every non-success path of the request pipeline ends in exactly one of
/// these variants. Local failures (`Validation`, `RequestTooLarge` raised
/// by the URL builder) never reach the network.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Request URL exceeds the maximum size of {max_size} bytes")]
    RequestTooLarge { url: String, max_size: usize },

    #[error("Client error: {}", describe_client(.http_status, .upstream_status, .body))]
    Client {
        http_status: u16,
        upstream_status: Option<UpstreamStatus>,
        body: String,
    },

    #[error("Server error: {}", describe_server(.http_status, .message))]
    Server {
        /// `None` when no HTTP response was received (timeout, refused connection, ...).
        http_status: Option<u16>,
        message: String,
    },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_client(status: &u16, upstream: &Option<UpstreamStatus>, body: &str) -> String {
    match upstream {
        Some(s) => format!("HTTP {} with upstream status {}", status, s),
        None => format!("HTTP {}: {}", status, body),
    }
}

fn describe_server(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(s) => format!("HTTP {}: {}", s, message),
        None => message.to_string(),
    }
}

impl Error {
    /// Whether repeating the identical request later may succeed.
    ///
    /// Only server-side failures qualify; this crate never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Server { .. })
    }

    /// HTTP status of the upstream response, when one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Client { http_status, .. } => Some(*http_status),
            Error::Server { http_status, .. } => *http_status,
            _ => None,
        }
    }

    /// Upstream status string embedded in an otherwise successful response.
    pub fn upstream_status(&self) -> Option<UpstreamStatus> {
        match self {
            Error::Client {
                upstream_status, ..
            } => *upstream_status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // Anything that fails below the HTTP status line is a transient upstream problem.
        let message = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else {
            format!("transport failure: {}", e)
        };
        Error::Server {
            http_status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_server_errors_are_retryable() {
        let server = Error::Server {
            http_status: Some(503),
            message: "unavailable".into(),
        };
        let client = Error::Client {
            http_status: 400,
            upstream_status: None,
            body: "bad".into(),
        };
        let too_large = Error::RequestTooLarge {
            url: "https://example.com".into(),
            max_size: 10,
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!too_large.is_retryable());
    }

    #[test]
    fn display_mentions_upstream_status() {
        let err = Error::Client {
            http_status: 200,
            upstream_status: Some(UpstreamStatus::OverQueryLimit),
            body: "{}".into(),
        };
        assert_eq!(
            err.to_string(),
            "Client error: HTTP 200 with upstream status OVER_QUERY_LIMIT"
        );
        assert_eq!(err.upstream_status(), Some(UpstreamStatus::OverQueryLimit));
        assert_eq!(err.http_status(), Some(200));
    }

    #[test]
    fn display_of_transport_failure_has_no_status() {
        let err = Error::Server {
            http_status: None,
            message: "request timed out".into(),
        };
        assert_eq!(err.to_string(), "Server error: request timed out");
        assert_eq!(err.http_status(), None);
    }
}
