//! Contact form relay: delivers form submissions to a remote endpoint with
//! bounded exponential-backoff retries.

pub mod config;
pub mod feedback;
pub mod form;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod submission;

pub use config::RelayConfig;
pub use form::{ContactFlow, FlowOutcome};
pub use resilience::RetryPolicy;
pub use submission::{SubmissionRequest, SubmissionResult, Submitter};
