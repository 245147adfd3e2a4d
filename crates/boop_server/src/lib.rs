//! Boop server - real-time two-player games over WebSockets.
//!
//! A browser client opens `/ws` to create a game, or `/ws?gameID=<id>` to
//! join one listed by `/getWaitingGame`. Each game is a [`Session`] holding a
//! [`boop_rules::GameState`]; the [`Registry`] tracks live sessions and the
//! pool waiting for an opponent.
//!
//! # Architecture
//!
//! - **Routes**: axum router with the WebSocket and listing endpoints
//! - **Connection**: reader loop plus writer task per player, with heartbeats
//! - **Session**: turn checks and broadcasts around the rule engine
//! - **Registry**: session directory and matchmaking pool
//! - **Config**: TOML file and CLI flags
//!
//! # Example
//!
//! ```no_run
//! use boop_server::{AppState, Registry, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let app = router(AppState::new(Registry::new(), config.heartbeat()));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod connection;
mod error;
mod message;
mod registry;
mod routes;
mod session;

// Crate-level exports - Configuration
pub use cli::{Cli, Command, ServeArgs};
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Connections
pub use connection::{Heartbeat, JOIN_FAILED, MALFORMED_FRAME, run, serve_socket};

// Crate-level exports - Errors
pub use error::{RegistryError, SessionError};

// Crate-level exports - Wire messages
pub use message::{Cell, ClientMessage, ServerMessage, SessionId};

// Crate-level exports - Sessions
pub use registry::Registry;
pub use session::{Outbox, Session};

// Crate-level exports - HTTP
pub use routes::{AppState, ConnectParams, NO_GAMES_WAITING, WaitingGames, router};
