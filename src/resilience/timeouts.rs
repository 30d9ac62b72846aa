//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap every delivery attempt with a deadline
//! - Cancel the in-flight attempt cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other transport errors

use std::future::Future;
use std::time::Duration;

use crate::submission::transport::TransportError;

/// Run `fut` with a deadline, mapping expiry to [`TransportError::Timeout`].
pub async fn with_timeout<F, T>(duration: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(duration)),
    }
}
