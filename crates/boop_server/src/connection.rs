//! Per-connection plumbing: a reader loop feeding the session and a writer
//! task draining the player's outbox and sending heartbeats.

use crate::message::{ClientMessage, ServerMessage, SessionId};
use crate::registry::Registry;
use crate::session::{Outbox, Session};
use axum::extract::ws::{Message, WebSocket};
use boop_rules::Player;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Error payload sent when a join cannot be honoured.
pub const JOIN_FAILED: &str = "Could not join game";

/// Error payload sent before dropping a client that sent garbage.
pub const MALFORMED_FRAME: &str = "Failed to read move";

/// Phase label reported when there is no session to take it from.
const NO_SESSION: &str = "none";

/// Keepalive timing for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct Heartbeat {
    /// How often a `ping` is sent.
    pub interval: Duration,
    /// How long the reader waits for any inbound frame.
    pub timeout: Duration,
}

/// Serves an upgraded WebSocket until the player leaves.
pub async fn serve_socket(
    socket: WebSocket,
    registry: Registry,
    heartbeat: Heartbeat,
    game_id: Option<SessionId>,
) {
    let (sink, stream) = socket.split();
    run(sink, stream, registry, heartbeat, game_id).await;
}

/// Seats the connection and pumps frames until it drops.
///
/// Without `game_id` a new pooled session is created; with one, the waiting
/// session is joined. A failed join gets an error frame and the sink is
/// closed. Whenever the reader stops, the player is removed from the session.
#[instrument(skip(sink, stream, registry))]
pub async fn run<W, R, E>(
    mut sink: W,
    stream: R,
    registry: Registry,
    heartbeat: Heartbeat,
    game_id: Option<SessionId>,
) where
    W: Sink<Message> + Unpin + Send + 'static,
    W::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let (outbox, queue) = mpsc::unbounded_channel();

    let seated = match &game_id {
        None => Ok(registry.create(outbox.clone())),
        Some(id) => registry.join(id, outbox.clone()),
    };

    let (session, player) = match seated {
        Ok(seated) => seated,
        Err(e) => {
            warn!(error = %e, "Join refused");
            let refusal = ServerMessage::Error {
                game_id: game_id.unwrap_or_default(),
                payload: JOIN_FAILED.to_string(),
                state: NO_SESSION,
            };
            if let Err(e) = send(&mut sink, &refusal).await {
                debug!(error = %e, "Could not deliver join refusal");
            }
            if let Err(e) = sink.close().await {
                debug!(error = %e, "Close after refusal failed");
            }
            return;
        }
    };

    info!(session_id = %session.id(), %player, "Player connected");

    let writer = tokio::spawn(write_loop(sink, queue, heartbeat.interval));

    read_loop(stream, &session, player, &outbox, heartbeat.timeout).await;

    registry.leave(&session, player);
    drop(outbox);

    if let Err(e) = writer.await {
        warn!(error = %e, "Writer task failed");
    }
    info!(session_id = %session.id(), %player, "Player disconnected");
}

/// Reads frames and routes them to the session until the connection is lost.
///
/// Any inbound frame counts as liveness. Silence longer than `timeout`, a
/// close, a transport error, or a frame that is not a client message ends
/// the loop.
async fn read_loop<R, E>(
    mut stream: R,
    session: &Session,
    player: Player,
    outbox: &Outbox,
    timeout: Duration,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        let frame = match tokio::time::timeout(timeout, stream.next()).await {
            Err(_) => {
                warn!(%player, "Heartbeat timed out");
                return;
            }
            Ok(None) => {
                debug!(%player, "Stream ended");
                return;
            }
            Ok(Some(Err(e))) => {
                warn!(%player, error = %e, "Transport error");
                return;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => {
                debug!(%player, "Close frame received");
                return;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Binary(_) => {
                warn!(%player, "Binary frame received");
                reply(outbox, player, session.error_message(MALFORMED_FRAME));
                return;
            }
        };

        let message = match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(message) => message,
            Err(e) => {
                warn!(%player, error = %e, "Malformed frame");
                reply(outbox, player, session.error_message(MALFORMED_FRAME));
                return;
            }
        };

        let result = match message {
            ClientMessage::Pong => {
                debug!(%player, "Pong");
                continue;
            }
            ClientMessage::Move { position, piece } => {
                session.submit_move(player, position.into(), piece)
            }
            ClientMessage::Choice { position } => session.submit_choice(player, position.into()),
        };

        if let Err(e) = result {
            reply(outbox, player, session.error_message(e.to_string()));
        }
    }
}

/// Queues a frame for this player alone.
fn reply(outbox: &Outbox, player: Player, message: ServerMessage) {
    if outbox.send(message).is_err() {
        debug!(%player, "Outbox closed, skipping reply");
    }
}

/// Drains the outbox onto the socket and pings every `interval`.
///
/// Ends once every sender is dropped and the queue is empty, or when the
/// socket refuses a frame.
async fn write_loop<W>(mut sink: W, mut queue: mpsc::UnboundedReceiver<ServerMessage>, interval: Duration)
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

    loop {
        let message = tokio::select! {
            queued = queue.recv() => match queued {
                Some(message) => message,
                None => break,
            },
            _ = ticker.tick() => ServerMessage::Ping,
        };

        if let Err(e) = send(&mut sink, &message).await {
            warn!(error = %e, "Send failed, stopping writer");
            return;
        }
    }

    if let Err(e) = sink.close().await {
        debug!(error = %e, "Close failed");
    }
}

async fn send<W>(sink: &mut W, message: &ServerMessage) -> Result<(), String>
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let text = message.to_json().map_err(|e| e.to_string())?;
    sink.send(Message::Text(text.into()))
        .await
        .map_err(|e| e.to_string())
}
