//! Boop server - command-line entry point.

use anyhow::Result;
use boop_server::{AppState, Cli, Command, Registry, ServeArgs, router};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,boop_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
    }
}

/// Run the game server until it is stopped.
async fn serve(args: ServeArgs) -> Result<()> {
    let config = args.resolve()?;
    info!(?config, "Starting boop server");

    let state = AppState::new(Registry::new(), config.heartbeat());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
