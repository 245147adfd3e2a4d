//! HTTP surface: the WebSocket endpoint and the waiting-games listing.

use crate::connection::{self, Heartbeat};
use crate::message::SessionId;
use crate::registry::Registry;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Placeholder listed when nobody is waiting for an opponent.
pub const NO_GAMES_WAITING: &str = "No games waiting";

/// Shared state handed to every handler.
#[derive(Debug, Clone, derive_new::new)]
pub struct AppState {
    /// Live sessions.
    pub registry: Registry,
    /// Keepalive timing for new connections.
    pub heartbeat: Heartbeat,
}

/// Query of the WebSocket endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectParams {
    /// Session to join; a new one is created when absent or empty.
    #[serde(rename = "gameID")]
    pub game_id: Option<SessionId>,
}

/// Body of `GET /getWaitingGame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingGames {
    /// Pooled session ids, or the placeholder.
    pub ids: Vec<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(connect))
        .route("/getWaitingGame", get(waiting_games))
        .with_state(state)
}

#[instrument(skip_all)]
async fn connect(
    upgrade: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Response {
    let game_id = params.game_id.filter(|id| !id.is_empty());
    debug!(?game_id, "Upgrading connection");

    upgrade.on_upgrade(move |socket| {
        connection::serve_socket(socket, state.registry, state.heartbeat, game_id)
    })
}

#[instrument(skip_all)]
async fn waiting_games(State(state): State<AppState>) -> impl IntoResponse {
    let mut ids = state.registry.waiting_ids();
    info!(waiting = ids.len(), "GET /getWaitingGame");
    if ids.is_empty() {
        ids.push(NO_GAMES_WAITING.to_string());
    }

    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(WaitingGames { ids }),
    )
}
