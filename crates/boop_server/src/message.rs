//! JSON frames exchanged with the browser client.

use boop_rules::{GameState, Player, Position};
use serde::{Deserialize, Serialize, Serializer};

/// Identifier of a game session.
pub type SessionId = String;

/// A frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Place a piece. `piece` is the rank code: 0 kitten, 1 cat.
    Move {
        /// Target cell.
        position: Cell,
        /// Rank code of the piece.
        piece: u8,
    },
    /// Pick a line to graduate or a piece to take back, depending on phase.
    Choice {
        /// Selected cell.
        position: Cell,
    },
    /// Heartbeat acknowledgement.
    Pong,
}

/// Coordinates as a client sends them, before any range check.
///
/// Any integer parses, so an out-of-range cell is refused by the rule engine
/// instead of being treated as a malformed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Cell {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

// Coordinates that do not fit a byte land on `u8::MAX`, which is off the board.
impl From<Cell> for Position {
    fn from(cell: Cell) -> Self {
        let clamp = |v: i64| u8::try_from(v).unwrap_or(u8::MAX);
        Position::new(clamp(cell.x), clamp(cell.y))
    }
}

/// A frame sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent once to a player when they take a seat.
    Joined {
        /// Session joined.
        game_id: SessionId,
        /// Seat assigned.
        #[serde(serialize_with = "player_label")]
        player_id: Player,
        /// Game as it stands.
        game_state: GameState,
    },
    /// Broadcast to every seated player after a resolved transition.
    GameState {
        /// Session the state belongs to.
        game_id: SessionId,
        /// The recipient's own seat.
        #[serde(serialize_with = "player_label")]
        player_id: Player,
        /// Phase label of the game.
        state: &'static str,
        /// Game as it stands.
        payload: GameState,
    },
    /// Sent to one player whose input was refused.
    Error {
        /// Session the error belongs to.
        game_id: SessionId,
        /// Human-readable reason.
        payload: String,
        /// Phase label at the time of the error.
        state: &'static str,
    },
    /// Heartbeat probe.
    Ping,
}

impl ServerMessage {
    /// Encodes the frame as JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn player_label<S: Serializer>(player: &Player, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(player)
}
