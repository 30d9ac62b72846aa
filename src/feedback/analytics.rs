//! Analytics event tracking.
//!
//! # Responsibilities
//! - Define the named events emitted around a form submission
//! - Provide sinks that forward them to logs, metrics, or memory
//!
//! # Design Decisions
//! - `track` is synchronous and infallible; delivery is best-effort
//! - Properties are free-form JSON values keyed by name

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Event names emitted by the relay.
pub mod events {
    pub const FORM_VALIDATION_ERROR: &str = "form_validation_error";
    pub const FORM_SUBMIT_ATTEMPT: &str = "form_submit_attempt";
    pub const FORM_SUBMIT_RETRY: &str = "form_submit_retry";
    pub const FORM_SUBMIT_MAX_RETRIES_EXCEEDED: &str = "form_submit_max_retries_exceeded";
    pub const FORM_SUBMIT_SUCCESS: &str = "form_submit_success";
    pub const FORM_SUBMIT_ERROR: &str = "form_submit_error";
    pub const FORM_SUBMIT_EXCEPTION: &str = "form_submit_exception";
    pub const LEAD_GENERATED: &str = "lead_generated";
}

/// A named event with a property mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
        }
    }

    /// Attach a property, replacing any previous value under `key`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Tracking collaborator. Implementations must not block or panic.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: AnalyticsEvent) {}
}

/// Logs each event with its properties as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        let properties = Value::Object(event.properties);
        tracing::info!(event = %event.name, properties = %properties, "Analytics event");
    }
}

/// Counts events per name through the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsAnalytics;

impl AnalyticsSink for MetricsAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        crate::observability::metrics::record_analytics_event(&event.name);
    }
}

/// Records events in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemoryAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events with the given name, in emission order.
    pub fn named(&self, name: &str) -> Vec<AnalyticsEvent> {
        self.events().into_iter().filter(|e| e.name == name).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }
}

impl AnalyticsSink for MemoryAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
