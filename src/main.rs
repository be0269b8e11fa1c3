//! Stubo Gateway
//!
//! A thin gateway that translates a simplified query-parameter API into
//! Stubo REST API v2 calls and relays responses.
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │               STUBO GATEWAY                │
//!                    │                                            │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌──────────┐ │
//!   ─────────────────┼─▶│  http  │──▶│ handlers │──▶│ upstream │─┼──▶ Stubo
//!                    │  │ server │   │translate │   │  client  │ │    API v2
//!                    │  └────────┘   └──────────┘   └──────────┘ │
//!                    │                                            │
//!                    │  ┌──────────────────────────────────────┐  │
//!                    │  │  config        observability         │  │
//!                    │  └──────────────────────────────────────┘  │
//!                    └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use stubo_gateway::config::loader::load_config;
use stubo_gateway::config::GatewayConfig;
use stubo_gateway::http::HttpServer;
use stubo_gateway::observability::{logging, metrics};
use stubo_gateway::upstream::UpstreamClient;

#[derive(Parser)]
#[command(name = "stubo-gateway")]
#[command(about = "HTTP gateway in front of a Stubo stub server", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Override the listener port from the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // An absent config file falls back to defaults; a present but invalid
    // one is fatal.
    let mut config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        GatewayConfig::default()
    };

    logging::init_logging(&config.observability.log_level);

    if !cli.config.exists() {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    if let Some(port) = cli.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_uri(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let upstream = UpstreamClient::new(reqwest::Client::new(), config.upstream.base_uri());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config, upstream);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
