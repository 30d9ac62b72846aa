//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Resolve endpoint → Build transport → Build flow
//! ```
//!
//! # Design Decisions
//! - The endpoint is chosen once at startup, never per call
//! - Startup failures are typed errors; submission failures are values

pub mod startup;

pub use startup::{build_flow, resolve_endpoint, StartupError};
