use super::Classification;
use crate::configuration::Configuration;
use crate::request::RequestDescriptor;
use crate::telemetry::{self, InstrumentationEvent, Payload};
use crate::{Error, Result};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Timeouts applied to one request, derived from the configuration.
///
/// `open` bounds TCP connect; the TLS handshake is part of connecting, so the
/// ssl budget is added to it. `read` bounds the whole exchange once sent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportTimeouts {
    pub connect: Option<Duration>,
    pub read: Option<Duration>,
}

impl TransportTimeouts {
    pub fn from_configuration(config: &Configuration) -> Self {
        let open = seconds(config.http_open_timeout);
        let ssl = seconds(config.http_ssl_timeout);
        let connect = match (open, ssl) {
            (Some(o), Some(s)) => Some(o.saturating_add(s)),
            (o, s) => o.or(s),
        };
        Self {
            connect,
            read: seconds(config.http_read_timeout),
        }
    }
}

// Unset, zero, non-finite and unrepresentable values leave the transport default in place.
fn seconds(value: Option<f64>) -> Option<Duration> {
    value
        .filter(|v| *v > 0.0)
        .and_then(|v| Duration::try_from_secs_f64(v).ok())
}

/// Executes [`RequestDescriptor`]s over HTTP(S).
///
/// A client is built per request so that every call observes the timeouts of
/// the configuration it was issued with.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }

    fn client(&self, timeouts: TransportTimeouts) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            // Redirects are not followed; a 3xx surfaces as a server error.
            .redirect(reqwest::redirect::Policy::none());
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(read) = timeouts.read {
            builder = builder.timeout(read);
        }
        builder.build().map_err(|e| Error::Server {
            http_status: None,
            message: format!("could not build HTTP client: {}", e),
        })
    }

    /// GET the request URL and classify the response.
    ///
    /// Exactly one [`InstrumentationEvent`] is reported to the configured
    /// sink, carrying `payload` unchanged, whatever the outcome.
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        config: &Configuration,
        payload: Payload,
    ) -> Result<Value> {
        let logged_url = config.filter_url(request.url());
        let started_at = telemetry::timestamp();
        let start = Instant::now();
        debug!(url = %logged_url, "requesting distance matrix");

        let result = self.exchange(request, config).await;
        let elapsed = start.elapsed().as_millis() as u64;

        let (outcome, http_status) = match &result {
            Ok((status, classification)) => (classification.outcome(), Some(*status)),
            Err(e) => ("server_error", e.http_status()),
        };
        match &result {
            Ok((_, Classification::Success(_))) => {
                info!(url = %logged_url, duration_ms = elapsed, http_status, "distance matrix request completed")
            }
            _ => warn!(
                url = %logged_url,
                outcome,
                http_status,
                duration_ms = elapsed,
                "distance matrix request failed"
            ),
        }

        if let Some(sink) = &config.instrumentation {
            let event = InstrumentationEvent::request(started_at, payload)
                .with_duration_ms(elapsed)
                .with_outcome(outcome)
                .with_http_status(http_status);
            if let Err(e) = sink.report(event).await {
                warn!(error = %e, "instrumentation sink rejected event");
            }
        }

        let (_, classification) = result?;
        classification.into_result()
    }

    async fn exchange(
        &self,
        request: &RequestDescriptor,
        config: &Configuration,
    ) -> Result<(u16, Classification)> {
        let client = self.client(TransportTimeouts::from_configuration(config))?;
        let response = client.get(request.url()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, Classification::classify(status, body, request.url())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_timeouts_use_transport_defaults() {
        let timeouts = TransportTimeouts::from_configuration(&Configuration::default());
        assert_eq!(timeouts, TransportTimeouts::default());
    }

    #[test]
    fn ssl_budget_extends_connect_timeout() {
        let config = Configuration::default().with_timeouts(Some(2.0), Some(10.0), Some(1.5));
        let timeouts = TransportTimeouts::from_configuration(&config);
        assert_eq!(timeouts.connect, Some(Duration::from_millis(3500)));
        assert_eq!(timeouts.read, Some(Duration::from_secs(10)));
    }

    #[test]
    fn ssl_timeout_alone_bounds_connect() {
        let config = Configuration::default().with_timeouts(None, None, Some(4.0));
        let timeouts = TransportTimeouts::from_configuration(&config);
        assert_eq!(timeouts.connect, Some(Duration::from_secs(4)));
        assert_eq!(timeouts.read, None);
    }

    #[test]
    fn non_positive_timeouts_are_ignored() {
        assert_eq!(seconds(Some(0.0)), None);
        assert_eq!(seconds(Some(-1.0)), None);
        assert_eq!(seconds(Some(f64::NAN)), None);
        assert_eq!(seconds(Some(0.25)), Some(Duration::from_millis(250)));
    }

    #[test]
    fn oversized_timeouts_do_not_panic() {
        assert_eq!(seconds(Some(1e20)), None);
        assert_eq!(seconds(Some(f64::INFINITY)), None);

        let config = Configuration::default().with_timeouts(Some(1e19), Some(1e19), Some(1e19));
        let timeouts = TransportTimeouts::from_configuration(&config);
        assert_eq!(timeouts.connect, Some(Duration::MAX));
        assert_eq!(timeouts.read, Some(Duration::from_secs(10_000_000_000_000_000_000)));
    }
}
