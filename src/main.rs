//! Federation provider daemon.
//!
//! Loads a TOML configuration, starts the polling provider and prints
//! each merged configuration as one JSON line on stdout, until ctrl-c.

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proxy_federation::{load_config, Provider};

#[derive(Parser)]
#[command(name = "proxy-federation", about = "Aggregate dynamic configuration from origin proxies")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "provider.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy_federation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing::info!(
        config = %cli.config.display(),
        endpoints = config.endpoints.len(),
        "configuration loaded"
    );

    let mut provider = Provider::new(config).await?;
    provider.init()?;

    let (tx, mut rx) = mpsc::channel(16);
    provider.provide(tx)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
            merged = rx.recv() => match merged {
                Some(configuration) => println!("{}", serde_json::to_string(&configuration)?),
                None => break,
            }
        }
    }

    provider.stop().await?;
    Ok(())
}
