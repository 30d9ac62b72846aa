//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

use crate::resilience::retries::RetryPolicy;

/// Calculate the delay before retry number `retry_index + 1`.
///
/// `retry_index` is zero-based: the first retry waits `base_delay_ms`, each
/// following one multiplies by `backoff_multiplier`, and the result never
/// exceeds `max_delay_ms`, jitter included.
pub fn calculate_backoff(retry_index: u32, policy: &RetryPolicy) -> Duration {
    let capped_delay = exponential_delay_ms(retry_index, policy);

    if !policy.jitter {
        return Duration::from_millis(capped_delay);
    }

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay.saturating_add(jitter).min(policy.max_delay_ms))
}

fn exponential_delay_ms(retry_index: u32, policy: &RetryPolicy) -> u64 {
    let exponent = i32::try_from(retry_index).unwrap_or(i32::MAX);
    let raw = policy.base_delay_ms as f64 * policy.backoff_multiplier.powi(exponent);

    if !raw.is_finite() || raw >= policy.max_delay_ms as f64 {
        policy.max_delay_ms
    } else {
        raw as u64
    }
}
