//! Contact form subsystem.
//!
//! # Data Flow
//! ```text
//! raw fields
//!     → validation.rs (required / email checks)
//!     → flow.rs (notify, track, submit, tailor the outcome message)
//! ```

pub mod flow;
pub mod validation;

pub use flow::{user_message, ContactFlow, FlowOutcome};
pub use validation::{looks_like_email, validate_fields, FieldError};
