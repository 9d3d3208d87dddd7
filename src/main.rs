//! Ledger Account Gateway
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌──────────┐
//! │  Client  │───▶│    Gateway    │───▶│  Broker  │
//! │  (HTTP)  │    │ (validate+map)│    │ (ledger) │
//! └──────────┘    └───────────────┘    └──────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use ledger_gateway::{AppConfig, AppState, logging, run_server};

#[derive(Parser, Debug)]
#[command(name = "ledger_gateway", version, about = "Ledger account gateway")]
struct Cli {
    /// Environment name, loads config/<env>.yaml
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Explicit config file, overrides --env
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(&cli.env)?,
    };
    if let Some(port) = cli.port {
        app_config.gateway.port = port;
    }

    let _log_guard = logging::init_logging(&app_config);
    tracing::info!("Starting ledger gateway in {} mode", cli.env);

    let state = AppState::from_config(&app_config.broker)
        .context("Failed to initialize broker adapter")?;
    #[cfg(feature = "mock-api")]
    if state.simulator.is_some() {
        tracing::warn!("⚠️  mock-api enabled: /internal/mock routes are exposed");
    }

    run_server(&app_config.gateway, Arc::new(state)).await
}
