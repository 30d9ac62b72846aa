//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::resilience::retries::RetryPolicy;

/// Environment variable consulted when `endpoint.environment = "auto"`.
pub const ENVIRONMENT_VAR: &str = "FORM_RELAY_ENV";

/// Root configuration for the form relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Endpoint selection (local vs. deployed).
    pub endpoint: EndpointConfig,

    /// Retry policy applied to every submission.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Contact form settings.
    pub form: FormConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Where the relay is running, which decides the endpoint URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Read [`ENVIRONMENT_VAR`] at startup.
    #[default]
    Auto,
    Local,
    Deployed,
}

impl Environment {
    /// Collapse `Auto` into a concrete environment using the process environment.
    pub fn detect(self) -> Environment {
        match self {
            Environment::Auto => match std::env::var(ENVIRONMENT_VAR) {
                Ok(value) => Environment::from_env_value(&value),
                Err(_) => Environment::Deployed,
            },
            concrete => concrete,
        }
    }

    fn from_env_value(value: &str) -> Environment {
        if value.trim().eq_ignore_ascii_case("local") {
            Environment::Local
        } else {
            Environment::Deployed
        }
    }
}

/// Endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Environment selector.
    pub environment: Environment,

    /// URL used when running locally.
    pub local_url: String,

    /// URL used when deployed.
    pub deployed_url: String,
}

impl EndpointConfig {
    /// Resolve the endpoint URL for the current execution environment.
    pub fn resolve(&self) -> &str {
        self.url_for(self.environment.detect())
    }

    /// URL for an already detected environment.
    pub fn url_for(&self, environment: Environment) -> &str {
        match environment {
            Environment::Local => &self.local_url,
            _ => &self.deployed_url,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Auto,
            local_url: "http://localhost:3000/api/send-email".to_string(),
            deployed_url: "https://api.example.com/api/send-email".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Growth factor applied per retry.
    pub backoff_multiplier: f64,

    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
            max_delay_ms: self.max_delay_ms,
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-attempt timeout (full request/response) in seconds.
    pub request_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            connect_secs: 10,
        }
    }
}

/// Contact form configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Form identifier attached to analytics events.
    pub form_name: String,

    /// Fields that must be present and non-blank.
    pub required_fields: Vec<String>,

    /// Fields checked for a plausible email address.
    pub email_fields: Vec<String>,

    /// Address shown to users when delivery keeps failing.
    pub contact_email: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_name: "contact_form".to_string(),
            required_fields: vec!["name".into(), "email".into(), "message".into()],
            email_fields: vec!["email".into()],
            contact_email: "hello@example.com".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record submission metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let config = RelayConfig::default();
        let policy = config.retries.policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.max_delay_ms, 8000);
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert!(!policy.jitter);
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.form.form_name, "contact_form");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [retries]
            max_retries = 5

            [endpoint]
            environment = "local"
            "#,
        )
        .unwrap();

        assert_eq!(config.retries.max_retries, 5);
        assert_eq!(config.retries.base_delay_ms, 1000);
        assert_eq!(config.endpoint.environment, Environment::Local);
        assert_eq!(config.endpoint.resolve(), config.endpoint.local_url);
    }

    #[test]
    fn test_explicit_environment_ignores_env_var() {
        let endpoint = EndpointConfig {
            environment: Environment::Deployed,
            ..EndpointConfig::default()
        };
        assert_eq!(endpoint.resolve(), endpoint.deployed_url);
    }

    #[test]
    fn test_env_value_parsing() {
        assert_eq!(Environment::from_env_value("local"), Environment::Local);
        assert_eq!(Environment::from_env_value(" LOCAL "), Environment::Local);
        assert_eq!(Environment::from_env_value("production"), Environment::Deployed);
        assert_eq!(Environment::from_env_value(""), Environment::Deployed);
    }
}
