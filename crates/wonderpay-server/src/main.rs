//! WonderPay capital API server.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wonderpay_server::config::{build_config, CliArgs};
use wonderpay_server::server::Server;

/// WonderPay capital API - loan calculations over HTTP
#[derive(Parser, Debug)]
#[command(name = "wonderpay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "WONDERPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for CliArgs {
    fn from(args: Args) -> Self {
        CliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli_args: CliArgs = Args::parse().into();
    let config = build_config(&cli_args)?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("WonderPay server v{}", wonderpay_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        cors_origins = ?config.cors_origins,
        max_term_months = config.max_term_months,
        "Server configuration loaded"
    );
    if config.environment.is_production() && config.cors_origins.is_empty() {
        tracing::warn!("No CORS origins configured; browsers on other origins will be refused");
    }

    let server = Server::new(config);
    tracing::info!(address = %server.config().socket_addr(), "Starting server");
    server.run().await?;

    Ok(())
}
