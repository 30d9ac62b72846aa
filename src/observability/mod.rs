//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Submitter and contact flow produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (tracing-subscriber fmt layer)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a submission
//! - Metrics are cheap and no-ops without a recorder

pub mod logging;
pub mod metrics;
