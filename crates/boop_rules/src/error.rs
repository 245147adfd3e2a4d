//! Rule violations reported by the engine.

use crate::piece::PieceKind;
use crate::position::Position;

/// Error that can occur when validating or applying a move or choice.
///
/// Every variant is a clean rejection: the game state is left untouched and
/// the player may try again.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The position lies outside the board.
    #[display("Position {} is off the board", _0)]
    InvalidPosition(Position),

    /// The piece is empty or belongs to the player who is not moving.
    #[display("Cannot place {} this turn", _0)]
    InvalidPieceKind(PieceKind),

    /// The target cell already holds a piece.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// The player has none of that piece left in hand.
    #[display("No {} left in hand", _0)]
    NoStock(PieceKind),

    /// The position is not one of the offered line choices.
    #[display("{} does not select any of the completed lines", _0)]
    InvalidLineChoice(Position),

    /// The position does not hold one of the player's own pieces.
    #[display("{} does not hold one of your pieces", _0)]
    InvalidReturnChoice(Position),

    /// The input does not fit the current phase of the turn.
    #[display("Expected {expected}, but the game is in {actual}")]
    WrongPhase {
        /// Phase the input is valid in.
        expected: &'static str,
        /// Phase the game is actually in.
        actual: &'static str,
    },

    /// The game has already concluded.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// A hand-built arrangement breaks the game's bookkeeping rules.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid game arrangement: {}", message)]
pub struct StateError {
    /// What was wrong with the arrangement.
    pub message: String,
}

impl StateError {
    /// Creates a new arrangement error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::error::Error for StateError {}
