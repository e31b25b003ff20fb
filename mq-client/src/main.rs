//! mq-drain - destructive queue drainer.
//!
//! Connects to the configured queue manager, reads every available
//! message off the queue (removing them), converts EBCDIC payloads to
//! UTF-8, and prints them with a final count. Ctrl+C stops the loop
//! early; the partial count is still reported and cleanup still runs.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mqclient::{ops, report, ConnectionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    tracing::info!("drain_starting");

    // Load configuration from environment; missing keys fail here,
    // before any connection attempt.
    let config = ConnectionConfig::from_env()?;
    println!("{}", report::banner("MQ Message Drainer", &config));

    let outcome = ops::run_drain(&config).await?;
    tracing::info!(
        consumed = outcome.consumed,
        interrupted = outcome.interrupted,
        "drain_finished"
    );

    Ok(())
}
