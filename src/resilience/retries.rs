//! Retry logic.
//!
//! # Responsibilities
//! - Describe the retry budget of a submission (`RetryPolicy`)
//! - Classify response statuses into retryable and terminal
//! - Answer whether another attempt is allowed
//!
//! # Design Decisions
//! - Connection errors and timeouts always retryable
//! - 5xx retryable; every other non-2xx status is terminal on first sight
//! - A terminal status never consumes a retry

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::backoff::calculate_backoff;

/// Retry budget and backoff shape for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Add up to 10% random jitter (still capped at `max_delay_ms`).
    pub jitter: bool,
}

impl RetryPolicy {
    /// Total network attempts this policy permits.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether a retry may follow after `attempts_made` failed attempts.
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        attempts_made.saturating_sub(1) < self.max_retries
    }

    /// Delay before retry `retry_index + 1`.
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        calculate_backoff(retry_index, self)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        crate::config::RetryConfig::default().policy()
    }
}

/// Coarse classification of an HTTP response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Anything below 500 that is not 2xx.
    Client,
    Server,
}

/// Classify a response status.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        500..=u16::MAX => StatusClass::Server,
        _ => StatusClass::Client,
    }
}

/// Check whether an attempt outcome is worth retrying.
///
/// `status` is the response status if one arrived; `transport_error` marks
/// timeouts and connection failures.
pub fn is_retryable(status: Option<u16>, transport_error: bool) -> bool {
    if transport_error {
        return true;
    }
    matches!(status.map(classify_status), Some(StatusClass::Server))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(204), StatusClass::Success);
        assert_eq!(classify_status(302), StatusClass::Client);
        assert_eq!(classify_status(400), StatusClass::Client);
        assert_eq!(classify_status(422), StatusClass::Client);
        assert_eq!(classify_status(499), StatusClass::Client);
        assert_eq!(classify_status(500), StatusClass::Server);
        assert_eq!(classify_status(503), StatusClass::Server);
    }

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(None, true));
        assert!(is_retryable(Some(503), false));
        assert!(!is_retryable(Some(422), false));
        assert!(!is_retryable(Some(200), false));
    }

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy {
            max_retries: 3,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.max_attempts(), 4);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(3));
        assert!(!policy.allows_retry(4));

        let no_retries = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(no_retries.max_attempts(), 1);
        assert!(!no_retries.allows_retry(1));
    }

    #[test]
    fn test_max_attempts_saturates() {
        let policy = RetryPolicy {
            max_retries: u32::MAX,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.max_attempts(), u32::MAX);
    }
}
