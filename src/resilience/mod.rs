//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Submission attempt:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On failure: retries.rs (classify, check remaining budget)
//!     → backoff.rs (compute bounded delay before next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Delay growth is capped regardless of attempt count
//! - Jitter is opt-in so delays stay predictable by default

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use retries::{classify_status, is_retryable, RetryPolicy, StatusClass};
pub use timeouts::with_timeout;
