mod app;
mod cli;
mod command;
mod render;

use std::sync::Arc;

use mentor_ai::{OpenAiClient, OpenAiConfig, SessionController};
use mentor_common::{MentorError, Result};
use mentor_config::MentorConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Flow};

fn main() {
    if let Err(e) = start() {
        tracing::error!("mentor failed: {e}");
        eprintln!("mentor: {e}");
        std::process::exit(1);
    }
}

/// `.env` is applied before the runtime starts any worker threads.
fn start() -> Result<()> {
    let args = cli::parse();
    let cwd = std::env::current_dir()?;
    mentor_config::load_dotenv(&mentor_config::dotenv_candidates(&cwd));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args))
}

async fn run(args: cli::Args) -> Result<()> {
    let loaded = match &args.config {
        Some(path) => mentor_config::load_config_from(path),
        None => mentor_config::load_config(),
    };
    let config = match loaded {
        Ok(config) => {
            init_tracing(args.log_level.as_deref(), &config);
            config
        }
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            let config = MentorConfig::default();
            init_tracing(args.log_level.as_deref(), &config);
            tracing::warn!("Config load failed, using defaults: {e}");
            config
        }
    };

    let api_key = mentor_config::provider_api_key()?;
    let client = OpenAiClient::new(OpenAiConfig::from_settings(&config.provider, api_key))
        .map_err(|e| MentorError::Ai(e.to_string()))?;
    tracing::info!("Mentor v{} starting ({})", env!("CARGO_PKG_VERSION"), config.provider.model);

    let session = SessionController::new(Arc::new(client));
    let mut status_rx = session.subscribe();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, event_tx, std::io::stdout());

    if let Some(problem) = args.problem.as_deref() {
        app.set_problem(problem)?;
    }
    app.greet()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Some(command) = command::parse(&line) {
                    if app.dispatch(command).await? == Flow::Quit {
                        break;
                    }
                }
            }
            Some(event) = event_rx.recv() => app.on_event(event)?,
            Ok(()) = status_rx.changed() => {
                let status = *status_rx.borrow_and_update();
                app.on_status(status)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log to stderr so the transcript on stdout stays clean.
fn init_tracing(cli_directive: Option<&str>, config: &MentorConfig) {
    let fallback = cli_directive
        .map(str::to_string)
        .unwrap_or_else(|| config.logging.filter_directive());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
