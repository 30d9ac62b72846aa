//! Metrics collection.
//!
//! # Metrics
//! - `form_relay_attempts_total` (counter): delivery attempts by outcome
//! - `form_relay_retries_total` (counter): scheduled retries
//! - `form_relay_submissions_total` (counter): terminal results by kind
//! - `form_relay_submission_duration_seconds` (histogram): end-to-end latency
//! - `form_relay_analytics_events_total` (counter): analytics events by name
//!
//! All functions go through the `metrics` facade and are no-ops until a
//! recorder is installed. The CLI installs the Prometheus one with
//! [`install_recorder`] and renders a snapshot on exit.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Install the process-wide Prometheus recorder.
///
/// No listener is started; render the returned handle to read the values.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record one delivery attempt. `outcome` is e.g. `success`, `server_error`.
pub fn record_attempt(outcome: &'static str) {
    counter!("form_relay_attempts_total", "outcome" => outcome).increment(1);
}

/// Record a scheduled retry and its delay.
pub fn record_retry(delay_ms: u64) {
    counter!("form_relay_retries_total").increment(1);
    histogram!("form_relay_retry_delay_ms").record(delay_ms as f64);
}

/// Record a terminal submission result.
pub fn record_submission(result: &'static str, start_time: Instant) {
    counter!("form_relay_submissions_total", "result" => result).increment(1);
    histogram!("form_relay_submission_duration_seconds", "result" => result)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an analytics event by name.
pub fn record_analytics_event(name: &str) {
    counter!("form_relay_analytics_events_total", "event" => name.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_counters_reach_prometheus_snapshot() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_attempt("server_error");
            record_attempt("success");
            record_retry(1000);
            record_analytics_event("lead_generated");
        });

        let snapshot = handle.render();
        assert!(snapshot.contains(r#"form_relay_attempts_total{outcome="server_error"} 1"#));
        assert!(snapshot.contains(r#"form_relay_attempts_total{outcome="success"} 1"#));
        assert!(snapshot.contains("form_relay_retries_total 1"));
        assert!(snapshot.contains(r#"form_relay_analytics_events_total{event="lead_generated"} 1"#));
    }
}
