//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → lifecycle::startup builds the contact flow from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The endpoint is resolved once, at startup, from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::RelayConfig;
pub use schema::{
    EndpointConfig, Environment, FormConfig, ObservabilityConfig, RetryConfig, TimeoutConfig,
};
pub use validation::ValidationError;
