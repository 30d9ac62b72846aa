//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, multiplier > 1, timeouts > 0)
//! - Check that endpoint URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{RelayConfig, RetryConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("retries.base_delay_ms must be greater than 0")]
    ZeroBaseDelay,

    #[error("retries.max_delay_ms ({max}) must be >= retries.base_delay_ms ({base})")]
    MaxDelayBelowBase { base: u64, max: u64 },

    #[error("retries.backoff_multiplier must be greater than 1 (got {0})")]
    MultiplierTooSmall(f64),

    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("endpoint.{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("form.form_name must not be empty")]
    EmptyFormName,
}

/// Validate a full configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(retry_errors) = validate_retries(&config.retries) {
        errors.extend(retry_errors);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }

    for (field, value) in [
        ("local_url", &config.endpoint.local_url),
        ("deployed_url", &config.endpoint.deployed_url),
    ] {
        if let Err(e) = Url::parse(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                reason: e.to_string(),
            });
        }
    }

    if config.form.form_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFormName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the retry section.
pub fn validate_retries(retries: &RetryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if retries.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBaseDelay);
    }
    if retries.max_delay_ms < retries.base_delay_ms {
        errors.push(ValidationError::MaxDelayBelowBase {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }
    // NaN fails this comparison too
    if !(retries.backoff_multiplier > 1.0) {
        errors.push(ValidationError::MultiplierTooSmall(retries.backoff_multiplier));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
