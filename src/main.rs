//! form-relay CLI.
//!
//! Submits one contact form to the configured endpoint, retrying transient
//! failures, and reports progress on stderr.
//!
//! ```text
//! form-relay --config relay.toml \
//!     --field name=Ada --field email=ada@example.com --field message=Hello
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use form_relay::config::{self, validation::validate_config, Environment, RelayConfig};
use form_relay::feedback::{
    AnalyticsSink, ConsoleNotifier, MetricsAnalytics, NoopAnalytics, TracingAnalytics,
};
use form_relay::form::FlowOutcome;
use form_relay::lifecycle::build_flow;
use form_relay::observability::logging::init_logging;
use form_relay::observability::metrics::install_recorder;
use form_relay::SubmissionRequest;

#[derive(Parser)]
#[command(name = "form-relay")]
#[command(about = "Submit a contact form with retry and backoff", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force the execution environment instead of reading FORM_RELAY_ENV
    #[arg(long, value_enum)]
    env: Option<EnvArg>,

    /// Override the endpoint URL for this run
    #[arg(long)]
    endpoint: Option<String>,

    /// Override retries.max_retries
    #[arg(long)]
    max_retries: Option<u32>,

    /// Where analytics events go
    #[arg(long, value_enum, default_value_t = AnalyticsArg::Log)]
    analytics: AnalyticsArg,

    /// Form field as KEY=VALUE (repeatable)
    #[arg(short, long = "field", value_parser = parse_field, required = true)]
    fields: Vec<(String, String)>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EnvArg {
    Local,
    Deployed,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AnalyticsArg {
    Log,
    Metrics,
    Off,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn apply_overrides(mut config: RelayConfig, cli: &Cli) -> RelayConfig {
    if let Some(env) = cli.env {
        config.endpoint.environment = match env {
            EnvArg::Local => Environment::Local,
            EnvArg::Deployed => Environment::Deployed,
        };
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.environment = Environment::Deployed;
        config.endpoint.deployed_url = endpoint.clone();
    }
    if let Some(max_retries) = cli.max_retries {
        config.retries.max_retries = max_retries;
    }
    config
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => RelayConfig::default(),
    };
    let relay_config = apply_overrides(loaded, &cli);
    validate_config(&relay_config).map_err(config::ConfigError::Validation)?;

    init_logging(&relay_config.observability)?;

    let metrics_handle = if wants_metrics(&relay_config, cli.analytics) {
        Some(install_recorder()?)
    } else {
        None
    };

    let analytics: Arc<dyn AnalyticsSink> = match cli.analytics {
        AnalyticsArg::Log => Arc::new(TracingAnalytics),
        AnalyticsArg::Metrics => Arc::new(MetricsAnalytics),
        AnalyticsArg::Off => Arc::new(NoopAnalytics),
    };
    let flow = build_flow(&relay_config, Arc::new(ConsoleNotifier), analytics)?;

    let fields: SubmissionRequest = cli.fields.into_iter().collect();
    let exit_code = match flow.submit(&fields).await {
        FlowOutcome::Delivered(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            ExitCode::SUCCESS
        }
        FlowOutcome::Invalid(errors) => {
            for error in errors {
                eprintln!("  - {}", error);
            }
            ExitCode::from(2)
        }
        FlowOutcome::Failed { failure, .. } => {
            tracing::debug!(failure = ?failure, "Submission failed");
            ExitCode::FAILURE
        }
    };

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }
    Ok(exit_code)
}

/// A recorder is needed when submission metrics are on or analytics go to metrics.
fn wants_metrics(config: &RelayConfig, analytics: AnalyticsArg) -> bool {
    config.observability.metrics_enabled || analytics == AnalyticsArg::Metrics
}
