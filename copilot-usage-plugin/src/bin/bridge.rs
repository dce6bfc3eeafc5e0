//! Copilot usage bridge.
//!
//! Reads host events as JSON lines on stdin and writes toast requests as
//! JSON lines on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use copilot_usage_plugin::{JsonLinesNotifier, PluginConfig, UsageReporter, run_event_loop};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let config = PluginConfig::from_env();
    info!(
        backend = %config.backend,
        credentials = %config.credentials,
        quota = config.quota,
        "Starting Copilot usage bridge"
    );

    let notifier = JsonLinesNotifier::new(tokio::io::stdout());
    let mut reporter =
        UsageReporter::from_config(&config, notifier).context("Failed to build reporter")?;

    let handled = run_event_loop(BufReader::new(tokio::io::stdin()), &mut reporter)
        .await
        .context("Failed to read events from stdin")?;

    info!(handled, "Event stream closed");
    Ok(())
}
