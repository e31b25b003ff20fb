//! mq-produce - put encoded text messages onto a queue.
//!
//! Payloads are encoded to the configured EBCDIC code page (PUT_CCSID,
//! default 500) before the put, and tagged with the same CCSID.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mqclient::ops::{self, PayloadSpec};
use mqclient::{report, ConnectionConfig};

#[derive(Parser)]
#[command(name = "mq-produce")]
#[command(about = "Put encoded text messages onto an MQ queue")]
struct Cli {
    /// How many messages to send.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Message text (defaults to the built-in sample record).
    #[arg(long)]
    text: Option<String>,

    /// Generate random ASCII text (up to 80 chars) per message instead
    /// of the sample record.
    #[arg(long, conflicts_with = "text")]
    random: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let config = ConnectionConfig::from_env()?;
    println!("{}", report::banner("MQ Message Producer", &config));

    let payload = match (cli.text, cli.random) {
        (Some(text), _) => PayloadSpec::Fixed(text),
        (None, true) => PayloadSpec::Random,
        (None, false) => PayloadSpec::Sample,
    };

    let outcome = ops::run_produce(&config, cli.count, &payload).await?;
    tracing::info!(sent = outcome.sent, "produce_finished");

    Ok(())
}
