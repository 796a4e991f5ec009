// ABOUTME: Main entry point for the vmdocker agent
// ABOUTME: Initializes logging, config and metrics, then serves spawn/apply over HTTP

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vmdocker_agent::{config::Config, metrics, routes, AgentServer};

/// Single-runtime execution agent
#[derive(Parser, Debug)]
#[command(name = "vmdocker-agent")]
#[command(about = "Serves one execution runtime over HTTP (spawn once, apply many)", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host, overrides config
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides config
    #[arg(short, long)]
    port: Option<u16>,

    /// Runtime backend type, overrides config and RUNTIME_TYPE
    #[arg(long)]
    runtime_type: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "AGENT_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "Agent panicked");
        eprintln!("{}", panic_info);
        eprintln!("{:?}", std::backtrace::Backtrace::force_capture());
    }));

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting vmdocker agent");

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(runtime_type) = cli.runtime_type {
        config.runtime.runtime_type = runtime_type;
    }
    config.validate()?;

    tracing::info!(
        addr = %config.bind_addr(),
        runtime_type = %config.runtime.runtime_type,
        "Configuration loaded"
    );

    let metrics_handle = match metrics::init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics disabled");
            None
        }
    };

    let server = Arc::new(AgentServer::from_config(&config.runtime));
    routes::serve(&config.bind_addr(), server, metrics_handle).await
}
