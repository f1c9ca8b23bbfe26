use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forager::config::AppConfig;
use forager::server::{create_router, AppState};
use forager::shutdown::wait_for_shutdown;

#[derive(Parser)]
#[command(name = "forager", about = "Turns research queries into GitHub issues")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting Forager server"
    );

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(config.clone(), shutdown.clone())?);

    let app = create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.server.host, config.server.port
    ))
    .await?;

    tracing::info!("Listening on {}", listener.local_addr()?);

    // Cancelling the token stops in-flight workflows at their next stage
    // boundary and closes open progress streams, letting the graceful
    // shutdown below drain.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown().await;
            shutdown.cancel();
        })
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}
