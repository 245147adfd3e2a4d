//! Command-line interface for boop_server.

use crate::config::{ConfigError, ServerConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::instrument;

/// Boop - real-time two-player game server
#[derive(Parser, Debug)]
#[command(name = "boop_server")]
#[command(about = "WebSocket game server for boop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve(ServeArgs),
}

/// Options of the `serve` command. Flags override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds between heartbeat pings
    #[arg(long)]
    pub heartbeat_interval: Option<u64>,

    /// Seconds of silence before a connection is dropped
    #[arg(long)]
    pub heartbeat_timeout: Option<u64>,
}

impl ServeArgs {
    /// Resolves the effective configuration: defaults, then the config
    /// file, then command-line flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// result fails validation.
    #[instrument(skip(self))]
    pub fn resolve(&self) -> Result<ServerConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        let config = ServerConfig::new(
            self.host.clone().unwrap_or_else(|| base.host().clone()),
            self.port.unwrap_or(*base.port()),
            self.heartbeat_interval
                .unwrap_or(*base.heartbeat_interval_secs()),
            self.heartbeat_timeout
                .unwrap_or(*base.heartbeat_timeout_secs()),
        );
        config.validate()?;
        Ok(config)
    }
}
