//! Form submission subsystem.
//!
//! # Data Flow
//! ```text
//! SubmissionRequest
//!     → submitter.rs (retry loop, collaborator callbacks)
//!     → transport.rs (HTTP POST, raw status + body)
//!     → types.rs (classification into SubmissionResult)
//! ```
//!
//! # Design Decisions
//! - The submitter never returns `Err`; every terminal state is a value
//! - One request ID per submission, reused across retries
//! - No state is shared between concurrent submissions

pub mod submitter;
pub mod transport;
pub mod types;

pub use submitter::{interpret_response, Submitter, DEFAULT_ATTEMPT_TIMEOUT};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse, X_REQUEST_ID};
pub use types::{
    FailureKind, RetryCause, SubmissionError, SubmissionFailure, SubmissionRequest,
    SubmissionResponse, SubmissionResult,
};
