//! Feedback collaborators.
//!
//! # Data Flow
//! ```text
//! Submitter / ContactFlow
//!     → notifier.rs  (short user-facing messages with a severity)
//!     → analytics.rs (named events with property mappings)
//! ```
//!
//! # Design Decisions
//! - Collaborators are passed in explicitly as `Arc<dyn Trait>`
//! - Neither collaborator can fail or block the submission

pub mod analytics;
pub mod notifier;

pub use analytics::{
    events, AnalyticsEvent, AnalyticsSink, MemoryAnalytics, MetricsAnalytics, NoopAnalytics,
    TracingAnalytics,
};
pub use notifier::{ConsoleNotifier, MemoryNotifier, Notifier, Severity, TracingNotifier};
