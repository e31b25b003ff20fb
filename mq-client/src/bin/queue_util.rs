//! mq-queue-util - queue inspection utility (depth / browse).
//!
//! Usage examples:
//!   mq-queue-util --mode depth
//!   mq-queue-util --mode browse --max 10

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mqclient::{ops, report, ConnectionConfig};

#[derive(Parser)]
#[command(name = "mq-queue-util")]
#[command(about = "MQ queue utility (depth / browse)")]
struct Cli {
    /// Operation mode: 'depth' shows queue depth, 'browse' reads
    /// messages without removing them.
    #[arg(long, value_enum)]
    mode: Mode,

    /// Max messages to browse (only used with --mode browse).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    max: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Depth,
    Browse,
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
    println!("{}", report::banner("MQ Queue Utility", &config));

    match cli.mode {
        Mode::Depth => {
            ops::run_depth(&config).await?;
        }
        Mode::Browse => {
            ops::run_browse(&config, cli.max).await?;
        }
    }

    Ok(())
}
