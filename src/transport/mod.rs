//! Transport: execute a request and classify what came back.
//!
//! Classification is two tiered. The HTTP status decides first; a 2xx body is
//! then parsed and its top-level `status` checked, because the upstream
//! service reports several client errors inside successful responses.

mod http;

pub use http::{HttpTransport, TransportTimeouts};

use crate::request::MAX_URL_SIZE;
use crate::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Error statuses the upstream service embeds in 2xx responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamStatus {
    InvalidRequest,
    MaxElementsExceeded,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
}

impl UpstreamStatus {
    pub const ALL: [UpstreamStatus; 5] = [
        UpstreamStatus::InvalidRequest,
        UpstreamStatus::MaxElementsExceeded,
        UpstreamStatus::OverQueryLimit,
        UpstreamStatus::RequestDenied,
        UpstreamStatus::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStatus::InvalidRequest => "INVALID_REQUEST",
            UpstreamStatus::MaxElementsExceeded => "MAX_ELEMENTS_EXCEEDED",
            UpstreamStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            UpstreamStatus::RequestDenied => "REQUEST_DENIED",
            UpstreamStatus::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// `None` for `OK` and any status outside the error vocabulary.
    pub fn from_status(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == status)
    }
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a completed HTTP exchange can end.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Success(Value),
    ClientError { http_status: u16, body: String },
    ServerError { http_status: u16, body: String },
    RequestTooLarge { url: String, max_size: usize },
    UpstreamStatusError {
        http_status: u16,
        status: UpstreamStatus,
        body: String,
    },
}

impl Classification {
    /// Classify a response to a request for `url`.
    pub fn classify(http_status: u16, body: String, url: &str) -> Self {
        match http_status {
            200..=299 => Self::inspect_body(http_status, body),
            414 => Classification::RequestTooLarge {
                url: url.to_string(),
                max_size: MAX_URL_SIZE,
            },
            400..=499 => Classification::ClientError { http_status, body },
            500..=599 => Classification::ServerError { http_status, body },
            // Unknown statuses are treated as transient rather than as success.
            _ => Classification::ServerError { http_status, body },
        }
    }

    fn inspect_body(http_status: u16, body: String) -> Self {
        let parsed: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                return Classification::ServerError {
                    http_status,
                    body: format!("unparseable response body: {}", e),
                }
            }
        };
        let embedded = parsed
            .get("status")
            .and_then(Value::as_str)
            .and_then(UpstreamStatus::from_status);
        match embedded {
            Some(status) => Classification::UpstreamStatusError {
                http_status,
                status,
                body,
            },
            None => Classification::Success(parsed),
        }
    }

    /// Short label used in logs and instrumentation.
    pub fn outcome(&self) -> &'static str {
        match self {
            Classification::Success(_) => "success",
            Classification::ClientError { .. } => "client_error",
            Classification::ServerError { .. } => "server_error",
            Classification::RequestTooLarge { .. } => "request_too_large",
            Classification::UpstreamStatusError { .. } => "upstream_status_error",
        }
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Classification::Success(value) => Ok(value),
            Classification::ClientError { http_status, body } => Err(Error::Client {
                http_status,
                upstream_status: None,
                body,
            }),
            Classification::UpstreamStatusError {
                http_status,
                status,
                body,
            } => Err(Error::Client {
                http_status,
                upstream_status: Some(status),
                body,
            }),
            Classification::ServerError { http_status, body } => Err(Error::Server {
                http_status: Some(http_status),
                message: body,
            }),
            Classification::RequestTooLarge { url, max_size } => {
                Err(Error::RequestTooLarge { url, max_size })
            }
        }
    }
}
