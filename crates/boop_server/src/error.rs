//! Session and registry errors.

use boop_rules::{MoveError, Player};
use derive_more::Display;

/// Why a session refused a player's input.
///
/// Every variant leaves the game untouched; the message is sent back to the
/// offending player only.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// Input came from the player who is not moving.
    #[display("Not your turn")]
    NotYourTurn,

    /// The player holds no seat in this session.
    #[display("{} is not seated in this game", _0)]
    UnknownPlayer(Player),

    /// Only one seat is filled.
    #[display("Waiting for an opponent to join")]
    WaitingForOpponent,

    /// Every player left and the session was torn down.
    #[display("Game is closed")]
    Closed,

    /// Both seats are taken.
    #[display("Game already has two players")]
    Full,

    /// The rule engine rejected the move or choice.
    #[display("{}", _0)]
    Rule(MoveError),
}

impl std::error::Error for SessionError {}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::Rule(err)
    }
}

/// Why a connection could not be routed to a session.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RegistryError {
    /// No session with that id exists.
    #[display("Game {} not found", _0)]
    GameNotFound(String),

    /// The session exists but is not waiting for a player.
    #[display("Game {} is full", _0)]
    GameFull(String),
}

impl std::error::Error for RegistryError {}
