//! mentor-server: HTTP front for the DSA mentor.
//!
//! Exposes `POST /api/chat`, which turns a posted conversation plus problem
//! URL into a single completion call, and `GET /health`. The server keeps no
//! conversation state between requests.

mod error;
mod handlers;
mod protocol;
mod routes;


use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mentor_ai::{OpenAiClient, OpenAiConfig};
use mentor_common::{MentorError, Result};
use mentor_config::MentorConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::handlers::ServerState;

#[derive(Parser, Debug)]
#[command(name = "mentor-server", version, about = "HTTP chat backend for the DSA mentor")]
struct Args {
    /// Port to listen on (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Config file path override.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `mentor=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    if let Err(e) = start() {
        tracing::error!("mentor-server failed: {e}");
        eprintln!("mentor-server: {e}");
        std::process::exit(1);
    }
}

/// `.env` is applied before the runtime starts any worker threads.
fn start() -> Result<()> {
    let args = Args::parse();
    let cwd = std::env::current_dir()?;
    let dotenv = mentor_config::load_dotenv(&mentor_config::dotenv_candidates(&cwd));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args, dotenv))
}

async fn run(args: Args, dotenv: Option<PathBuf>) -> Result<()> {
    let loaded = match &args.config {
        Some(path) => mentor_config::load_config_from(path),
        None => mentor_config::load_config(),
    };
    let mut config = match loaded {
        Ok(config) => {
            init_tracing(args.log_level.as_deref(), &config);
            config
        }
        // An explicit config file must load; the default location may fall back.
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            let config = MentorConfig::default();
            init_tracing(args.log_level.as_deref(), &config);
            warn!("Config load failed, using defaults: {e}");
            config
        }
    };

    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    let api_key = mentor_config::provider_api_key()?;
    let client = OpenAiClient::new(OpenAiConfig::from_settings(&config.provider, api_key))
        .map_err(|e| MentorError::Ai(e.to_string()))?;
    info!(
        model = %config.provider.model,
        max_tokens = config.provider.max_tokens,
        "Completion provider ready"
    );

    let state = Arc::new(ServerState::new(Arc::new(client)));
    let app = routes::router(state, &config.server);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("mentor-server v{} listening on {addr}", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MentorError::Server(e.to_string()))?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(cli_directive: Option<&str>, config: &MentorConfig) {
    let fallback = cli_directive
        .map(str::to_string)
        .unwrap_or_else(|| config.logging.filter_directive());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
