//! The retrying submitter.
//!
//! # Retry Loop
//! ```text
//! attempt ──▶ deadline (timeouts.rs) ──▶ classify
//!   ▲                                     │
//!   │      retryable & budget left        │ 2xx + valid body ─▶ Success
//!   └──── sleep(backoff) ◀────────────────┤ other < 500      ─▶ Failure (terminal)
//!                                         │ budget spent     ─▶ Failure (exhausted)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::feedback::{events, AnalyticsEvent, AnalyticsSink, NoopAnalytics, Notifier, Severity, TracingNotifier};
use crate::observability::metrics;
use crate::resilience::retries::{classify_status, is_retryable, RetryPolicy, StatusClass};
use crate::resilience::timeouts::with_timeout;
use crate::submission::transport::{Transport, TransportResponse};
use crate::submission::types::{
    ErrorBody, SubmissionError, SubmissionFailure, SubmissionRequest, SubmissionResponse,
    SubmissionResult,
};

/// Default per-attempt deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers a [`SubmissionRequest`] through a [`Transport`], retrying
/// transient failures according to a [`RetryPolicy`].
pub struct Submitter<T> {
    transport: T,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn AnalyticsSink>,
    attempt_timeout: Duration,
    form_name: String,
    metrics_enabled: bool,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            notifier: Arc::new(TracingNotifier),
            analytics: Arc::new(NoopAnalytics),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            form_name: "contact_form".to_string(),
            metrics_enabled: true,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_form_name(mut self, form_name: impl Into<String>) -> Self {
        self.form_name = form_name.into();
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn analytics(&self) -> &Arc<dyn AnalyticsSink> {
        &self.analytics
    }

    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    /// Submit `request`, retrying retryable failures with bounded backoff.
    ///
    /// Makes at most `policy.max_retries + 1` attempts. Never fails other
    /// than by returning [`SubmissionResult::Failure`].
    pub async fn submit(&self, request: &SubmissionRequest, policy: &RetryPolicy) -> SubmissionResult {
        let start_time = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let max_attempts = policy.max_attempts();
        let mut attempts: u32 = 0;

        tracing::debug!(
            request_id = %request_id,
            form_name = %self.form_name,
            fields = request.len(),
            max_attempts,
            "Submitting form"
        );

        loop {
            attempts += 1;

            let error = match self.attempt(request, &request_id).await {
                Ok(response) => {
                    self.record_attempt("success");
                    tracing::info!(request_id = %request_id, attempt = attempts, "Submission delivered");
                    return self.finish(SubmissionResult::Success(response), start_time);
                }
                Err(e) => e,
            };
            self.record_attempt(error.metric_label());

            if !is_retryable(error.status(), error.is_transport()) {
                tracing::warn!(
                    request_id = %request_id,
                    attempt = attempts,
                    error = %error,
                    "Submission failed with terminal error"
                );
                let failure = SubmissionFailure::terminal(&error);
                return self.finish(SubmissionResult::Failure(failure), start_time);
            }

            if policy.allows_retry(attempts) {
                let retry_index = attempts - 1;
                let delay = policy.delay_for(retry_index);
                self.announce_retry(&request_id, &error, retry_index, delay, max_attempts);
                tokio::time::sleep(delay).await;
                continue;
            }

            tracing::error!(
                request_id = %request_id,
                attempts,
                error = %error,
                "Max retries exceeded"
            );
            self.analytics.track(
                AnalyticsEvent::new(events::FORM_SUBMIT_MAX_RETRIES_EXCEEDED)
                    .with("form_name", self.form_name.as_str())
                    .with("total_attempts", attempts)
                    .with("final_error", error.to_string()),
            );
            let failure = SubmissionFailure::exhausted(&error, attempts);
            return self.finish(SubmissionResult::Failure(failure), start_time);
        }
    }

    async fn attempt(
        &self,
        request: &SubmissionRequest,
        request_id: &str,
    ) -> Result<SubmissionResponse, SubmissionError> {
        let response = with_timeout(self.attempt_timeout, self.transport.send(request, request_id)).await?;
        interpret_response(response)
    }

    fn announce_retry(
        &self,
        request_id: &str,
        error: &SubmissionError,
        retry_index: u32,
        delay: Duration,
        max_attempts: u32,
    ) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let retry_attempt = retry_index + 1;

        tracing::info!(
            request_id = %request_id,
            retry_attempt,
            delay_ms,
            error = %error,
            "Retrying submission"
        );

        self.notifier.notify(
            &format!(
                "Connection issue. Retrying... (Attempt {}/{})",
                retry_attempt + 1,
                max_attempts
            ),
            Severity::Warning,
        );

        self.analytics.track(
            AnalyticsEvent::new(events::FORM_SUBMIT_RETRY)
                .with("form_name", self.form_name.as_str())
                .with("retry_attempt", retry_attempt)
                .with("delay_ms", delay_ms)
                .with("error_type", error.error_type()),
        );

        if self.metrics_enabled {
            metrics::record_retry(delay_ms);
        }
    }

    fn record_attempt(&self, outcome: &'static str) {
        if self.metrics_enabled {
            metrics::record_attempt(outcome);
        }
    }

    fn finish(&self, result: SubmissionResult, start_time: Instant) -> SubmissionResult {
        if self.metrics_enabled {
            metrics::record_submission(result.metric_label(), start_time);
        }
        result
    }
}

/// Turn a raw endpoint answer into a parsed response or an attempt error.
pub fn interpret_response(response: TransportResponse) -> Result<SubmissionResponse, SubmissionError> {
    let status = response.status;
    match classify_status(status) {
        StatusClass::Server => Err(SubmissionError::Server { status }),
        StatusClass::Client => Err(SubmissionError::Client {
            status,
            message: client_error_message(status, &response.body),
        }),
        StatusClass::Success => {
            let parsed: SubmissionResponse = serde_json::from_str(&response.body)
                .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;
            if !parsed.success {
                let reason = parsed
                    .error
                    .or(parsed.message)
                    .unwrap_or_else(|| "endpoint reported failure".to_string());
                return Err(SubmissionError::Rejected(reason));
            }
            Ok(parsed)
        }
    }
}

/// Server-provided `error` string, or a generic message when the body is
/// missing, malformed, or has no usable `error`.
fn client_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}
