//! Delivery transport.
//!
//! # Responsibilities
//! - POST the JSON payload to the configured endpoint
//! - Hand back the raw status and body for classification
//! - Map client-library errors into a small, retry-oriented taxonomy
//!
//! # Design Decisions
//! - No retry or deadline logic here; the submitter owns both
//! - Transport is a trait so the submitter can run against scripted peers

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;
use crate::resilience::retries::{classify_status, StatusClass};
use crate::submission::types::SubmissionRequest;

/// Correlation header sent with every attempt.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Transport-level failures. All of them are retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Raw answer from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One delivery attempt to the remote endpoint.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &SubmissionRequest,
        request_id: &str,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for `endpoint`. Only the connect timeout is set on
    /// the client; the per-attempt deadline is enforced by the submitter.
    pub fn new(endpoint: Url, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Use a caller-built client as is.
    pub fn with_client(endpoint: Url, client: Client) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &SubmissionRequest,
        request_id: &str,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(X_REQUEST_ID, request_id)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => text,
            // An unreadable error body still carries a usable status
            Err(e) if classify_status(status) != StatusClass::Success => {
                tracing::debug!(request_id = %request_id, status, error = %e, "Discarding unreadable error body");
                String::new()
            }
            Err(e) => return Err(TransportError::Body(e.to_string())),
        };

        Ok(TransportResponse { status, body })
    }
}
