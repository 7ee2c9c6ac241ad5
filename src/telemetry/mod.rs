//! Request instrumentation: one structured event per request attempt.
//!
//! The transport reports an [`InstrumentationEvent`] to the configured
//! [`InstrumentationSink`] exactly once per attempt, whatever the outcome.
//! Caller-supplied payload fields are forwarded untouched; timing and the
//! classified outcome are added alongside them. Sinks are never required for
//! correctness and their failures are logged and ignored.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`InstrumentationEvent`] | Event emitted per attempt |
//! | [`InstrumentationSink`] | Trait for event destinations |
//! | [`NoopSink`] | Default sink (discards events) |
//! | [`TracingSink`] | Forwards events to `tracing` (debug level) |
//! | [`InMemorySink`] | Keeps events in memory, for tests |
//! | [`CompositeSink`] | Fans out to several sinks |

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the event emitted for each request attempt.
pub const REQUEST_EVENT: &str = "client_request_matrix_data.google_distance_matrix";

/// Caller-supplied fields attached to an event.
pub type Payload = serde_json::Map<String, Value>;

pub(crate) fn timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentationEvent {
    pub name: String,
    /// Unix time (seconds) at which the attempt started.
    pub started_at: f64,
    pub duration_ms: u64,
    /// Classified outcome: `success`, `client_error`, `server_error`, ...
    pub outcome: String,
    pub http_status: Option<u16>,
    pub payload: Payload,
}

impl InstrumentationEvent {
    pub fn request(started_at: f64, payload: Payload) -> Self {
        Self {
            name: REQUEST_EVENT.to_string(),
            started_at,
            duration_ms: 0,
            outcome: String::new(),
            http_status: None,
            payload,
        }
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = outcome.into();
        self
    }

    pub fn with_http_status(mut self, status: Option<u16>) -> Self {
        self.http_status = status;
        self
    }
}

#[async_trait]
pub trait InstrumentationSink: Send + Sync {
    async fn report(&self, event: InstrumentationEvent) -> Result<()>;
}

pub struct NoopSink;

#[async_trait]
impl InstrumentationSink for NoopSink {
    async fn report(&self, _event: InstrumentationEvent) -> Result<()> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn InstrumentationSink> {
    Arc::new(NoopSink)
}

/// Logs every event at `debug` level.
#[derive(Default)]
pub struct TracingSink;

#[async_trait]
impl InstrumentationSink for TracingSink {
    async fn report(&self, event: InstrumentationEvent) -> Result<()> {
        tracing::debug!(
            event = event.name.as_str(),
            outcome = event.outcome.as_str(),
            http_status = event.http_status,
            duration_ms = event.duration_ms,
            payload = %serde_json::Value::Object(event.payload.clone()),
            "instrumentation"
        );
        Ok(())
    }
}

/// In-memory sink for testing.
pub struct InMemorySink {
    events: RwLock<Vec<InstrumentationEvent>>,
    max_events: usize,
}

impl InMemorySink {
    pub fn new(max: usize) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            max_events: max,
        }
    }
    pub fn events(&self) -> Vec<InstrumentationEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }
    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl InstrumentationSink for InMemorySink {
    async fn report(&self, event: InstrumentationEvent) -> Result<()> {
        let mut events = self.events.write().unwrap_or_else(|p| p.into_inner());
        events.push(event);
        if events.len() > self.max_events {
            events.remove(0);
        }
        Ok(())
    }
}

/// Composite sink for multiple destinations.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn InstrumentationSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }
    pub fn add_sink(mut self, sink: Arc<dyn InstrumentationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl InstrumentationSink for CompositeSink {
    async fn report(&self, event: InstrumentationEvent) -> Result<()> {
        for s in &self.sinks {
            if let Err(e) = s.report(event.clone()).await {
                tracing::warn!(error = %e, event = event.name.as_str(), "instrumentation sink failed");
            }
        }
        Ok(())
    }
}
