//! Submission payloads, results, and error taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::resilience::retries::is_retryable;
use crate::submission::transport::TransportError;

/// Form field contents, keyed by field name.
///
/// Immutable once built; serialized as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionRequest {
    fields: BTreeMap<String, String>,
}

impl SubmissionRequest {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field value, treating blank values as absent.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Body the endpoint returns with a 2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Any other fields the endpoint sends back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error body the endpoint may attach to a non-2xx status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Why a single delivery attempt failed.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Timeout or connection failure.
    #[error(transparent)]
    TransientNetwork(#[from] TransportError),

    #[error("Server error: {status}")]
    Server { status: u16 },

    #[error("{message}")]
    Client { status: u16, message: String },

    /// 2xx status but the body reported `success: false`.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// 2xx status but the body did not match the response schema.
    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

impl SubmissionError {
    /// Response status behind the error, when one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmissionError::Server { status } | SubmissionError::Client { status, .. } => {
                Some(*status)
            }
            SubmissionError::TransientNetwork(_)
            | SubmissionError::Rejected(_)
            | SubmissionError::InvalidResponse(_) => None,
        }
    }

    /// Timeout or connection failure, with no status at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, SubmissionError::TransientNetwork(_))
    }

    pub fn is_retryable(&self) -> bool {
        is_retryable(self.status(), self.is_transport())
    }

    /// Short name reported in analytics `error_type` properties.
    pub fn error_type(&self) -> &'static str {
        match self {
            SubmissionError::TransientNetwork(TransportError::Timeout(_)) => "TimeoutError",
            SubmissionError::TransientNetwork(_) => "NetworkError",
            SubmissionError::Server { .. } => "ServerError",
            SubmissionError::Client { .. } => "ClientError",
            SubmissionError::Rejected(_) => "RejectedError",
            SubmissionError::InvalidResponse(_) => "InvalidResponseError",
        }
    }

    /// Label for the attempt-outcome metric.
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            SubmissionError::TransientNetwork(TransportError::Timeout(_)) => "timeout",
            SubmissionError::TransientNetwork(_) => "network_error",
            SubmissionError::Server { .. } => "server_error",
            SubmissionError::Client { .. } => "client_error",
            SubmissionError::Rejected(_) => "rejected",
            SubmissionError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// The retryable condition seen on the final attempt of an exhausted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetryCause {
    Timeout,
    Connection,
    Server { status: u16 },
}

impl RetryCause {
    fn from_error(error: &SubmissionError) -> Option<Self> {
        match error {
            SubmissionError::TransientNetwork(TransportError::Timeout(_)) => Some(RetryCause::Timeout),
            SubmissionError::TransientNetwork(_) => Some(RetryCause::Connection),
            SubmissionError::Server { status } => Some(RetryCause::Server { status: *status }),
            _ => None,
        }
    }
}

/// Which terminal state a failed submission ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-2xx status below 500; never retried.
    Client { status: u16 },
    /// Every permitted attempt hit a retryable condition.
    Exhausted { attempts: u32, cause: RetryCause },
    Rejected,
    InvalidResponse,
}

/// A failed submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionFailure {
    pub message: String,
    pub retryable: bool,
    pub kind: FailureKind,
}

impl SubmissionFailure {
    /// Build the failure for a non-retryable attempt error.
    pub(crate) fn terminal(error: &SubmissionError) -> Self {
        let kind = match error {
            SubmissionError::Client { status, .. } => FailureKind::Client { status: *status },
            SubmissionError::Rejected(_) => FailureKind::Rejected,
            _ => FailureKind::InvalidResponse,
        };
        Self {
            message: error.to_string(),
            retryable: false,
            kind,
        }
    }

    /// Build the failure for a run that used up its retries.
    pub(crate) fn exhausted(error: &SubmissionError, attempts: u32) -> Self {
        let cause = RetryCause::from_error(error).unwrap_or(RetryCause::Connection);
        Self {
            message: error.to_string(),
            retryable: true,
            kind: FailureKind::Exhausted { attempts, cause },
        }
    }
}

/// Outcome of a submission. Failures are values, never panics or `Err`s.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success(SubmissionResponse),
    Failure(SubmissionFailure),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    pub fn response(&self) -> Option<&SubmissionResponse> {
        match self {
            SubmissionResult::Success(response) => Some(response),
            SubmissionResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SubmissionFailure> {
        match self {
            SubmissionResult::Success(_) => None,
            SubmissionResult::Failure(failure) => Some(failure),
        }
    }

    /// Label for the submission-result metric.
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            SubmissionResult::Success(_) => "success",
            SubmissionResult::Failure(f) => match f.kind {
                FailureKind::Client { .. } => "client_error",
                FailureKind::Exhausted { .. } => "exhausted",
                FailureKind::Rejected => "rejected",
                FailureKind::InvalidResponse => "invalid_response",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_serializes_flat() {
        let request: SubmissionRequest =
            [("name", "Ada"), ("email", "ada@example.com")].into_iter().collect();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Ada", "email": "ada@example.com"}));
        assert_eq!(request.get("name"), Some("Ada"));
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn test_non_blank() {
        let request: SubmissionRequest = [("phone", "   "), ("service", "audit")].into_iter().collect();
        assert_eq!(request.non_blank("phone"), None);
        assert_eq!(request.non_blank("service"), Some("audit"));
        assert_eq!(request.non_blank("missing"), None);
    }

    #[test]
    fn test_response_keeps_extra_fields() {
        let response: SubmissionResponse =
            serde_json::from_str(r#"{"success": true, "message": "sent", "id": 42}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("sent"));
        assert_eq!(response.extra.get("id"), Some(&Value::from(42)));
    }

    #[test]
    fn test_response_requires_success_field() {
        assert!(serde_json::from_str::<SubmissionResponse>(r#"{"message": "sent"}"#).is_err());
        assert!(serde_json::from_str::<SubmissionResponse>(r#"{"success": "yes"}"#).is_err());
    }

    #[test]
    fn test_error_classification() {
        let timeout = SubmissionError::from(TransportError::Timeout(Duration::from_secs(30)));
        assert!(timeout.is_retryable());
        assert_eq!(timeout.error_type(), "TimeoutError");

        let server = SubmissionError::Server { status: 503 };
        assert!(server.is_retryable());
        assert_eq!(server.to_string(), "Server error: 503");

        let client = SubmissionError::Client {
            status: 422,
            message: "Email is invalid".into(),
        };
        assert!(!client.is_retryable());
        assert_eq!(client.to_string(), "Email is invalid");
    }

    #[test]
    fn test_retry_gate_follows_status_class() {
        let connect = SubmissionError::from(TransportError::Connect("refused".into()));
        assert_eq!(connect.status(), None);
        assert!(connect.is_transport());
        assert!(connect.is_retryable());

        for status in [500, 502, 503, 599] {
            assert!(SubmissionError::Server { status }.is_retryable(), "{status}");
        }
        for status in [302, 400, 404, 429] {
            let client = SubmissionError::Client {
                status,
                message: String::new(),
            };
            assert_eq!(client.status(), Some(status));
            assert!(!client.is_retryable(), "{status}");
        }

        assert!(!SubmissionError::Rejected("no".into()).is_retryable());
        assert!(!SubmissionError::InvalidResponse("eof".into()).is_retryable());
    }

    #[test]
    fn test_failure_constructors() {
        let client = SubmissionError::Client {
            status: 400,
            message: "Bad".into(),
        };
        let failure = SubmissionFailure::terminal(&client);
        assert!(!failure.retryable);
        assert_eq!(failure.kind, FailureKind::Client { status: 400 });

        let exhausted =
            SubmissionFailure::exhausted(&SubmissionError::Server { status: 502 }, 4);
        assert!(exhausted.retryable);
        assert_eq!(
            exhausted.kind,
            FailureKind::Exhausted {
                attempts: 4,
                cause: RetryCause::Server { status: 502 }
            }
        );
    }
}
