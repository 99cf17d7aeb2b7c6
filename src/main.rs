//! Reading Atlas Web Server Binary
//!
//! Loads the reading and axis data, then serves the interactive 3D chart.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (port 8091, data from ./data)
//! reading-atlas
//!
//! # Container style: everything from the environment
//! PORT=8080 DEBUG=true DATA_DIR=/srv/data reading-atlas
//!
//! # With a config file
//! reading-atlas --config atlas.toml --port 9000
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reading_atlas::config::{Config, Overrides};
use reading_atlas::constants::APP_NAME;
use reading_atlas::web::{self, AppState};

/// Reading Atlas - interactive map of course readings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "READING_ATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "READING_ATLAS_HOST")]
    host: Option<String>,

    /// Port to listen on (default 8091)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory containing readings_data.json and axis_definitions.json
    #[arg(short, long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", value_parser = clap::builder::BoolishValueParser::new())]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            data_dir: self.data_dir.clone(),
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?.with_overrides(args.overrides());

    // Initialize tracing
    let filter = if config.server.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "{} v{} (debug={})",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        config.server.debug
    );
    info!("Data directory: {}", config.data.dir.display());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let state = AppState::load(config).context("Failed to load reading data")?;

    web::run_server(state, addr).await
}
