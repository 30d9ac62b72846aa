//! Startup wiring: config → transport → submitter → contact flow.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{Environment, RelayConfig};
use crate::feedback::{AnalyticsSink, Notifier};
use crate::form::ContactFlow;
use crate::submission::{HttpTransport, Submitter};

/// Errors raised while assembling the relay.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Resolve the environment once and the endpoint URL that goes with it.
pub fn resolve_endpoint(config: &RelayConfig) -> Result<(Environment, Url), StartupError> {
    let environment = config.endpoint.environment.detect();
    let raw = config.endpoint.url_for(environment);
    let url = raw.parse().map_err(|source| StartupError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })?;
    Ok((environment, url))
}

/// Build a ready-to-use contact flow over HTTP.
pub fn build_flow(
    config: &RelayConfig,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn AnalyticsSink>,
) -> Result<ContactFlow<HttpTransport>, StartupError> {
    let (environment, endpoint) = resolve_endpoint(config)?;
    let transport = HttpTransport::new(endpoint, &config.timeouts)?;
    let policy = config.retries.policy();

    tracing::info!(
        endpoint = %transport.endpoint(),
        environment = ?environment,
        max_retries = policy.max_retries,
        base_delay_ms = policy.base_delay_ms,
        max_delay_ms = policy.max_delay_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Form relay configured"
    );

    let submitter = Submitter::new(transport)
        .with_notifier(notifier)
        .with_analytics(analytics)
        .with_attempt_timeout(Duration::from_secs(config.timeouts.request_secs))
        .with_form_name(config.form.form_name.clone())
        .with_metrics(config.observability.metrics_enabled);

    Ok(ContactFlow::new(submitter, policy, config.form.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{MemoryAnalytics, MemoryNotifier};

    #[test]
    fn test_build_flow_uses_configured_endpoint() {
        let mut config = RelayConfig::default();
        config.endpoint.environment = Environment::Local;
        config.retries.max_retries = 1;

        let flow = build_flow(
            &config,
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryAnalytics::new()),
        )
        .unwrap();

        assert_eq!(
            flow.submitter().transport().endpoint().as_str(),
            "http://localhost:3000/api/send-email"
        );
        assert_eq!(flow.policy().max_retries, 1);
        assert_eq!(flow.submitter().form_name(), "contact_form");
    }

    #[test]
    fn test_resolved_environment_matches_url() {
        let mut config = RelayConfig::default();
        config.endpoint.environment = Environment::Local;
        let (environment, url) = resolve_endpoint(&config).unwrap();
        assert_eq!(environment, Environment::Local);
        assert_eq!(url.as_str(), config.endpoint.local_url);

        config.endpoint.environment = Environment::Deployed;
        let (environment, url) = resolve_endpoint(&config).unwrap();
        assert_eq!(environment, Environment::Deployed);
        assert_eq!(url.as_str(), config.endpoint.deployed_url);
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = RelayConfig::default();
        config.endpoint.environment = Environment::Deployed;
        config.endpoint.deployed_url = "::not-a-url".into();

        let err = resolve_endpoint(&config).unwrap_err();
        assert!(matches!(err, StartupError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("::not-a-url"));
    }
}
