//! Boop rules - deterministic rule engine for a two-player
//! placement-and-push board game.
//!
//! Players take turns placing kittens and cats on a 6x6 board. A placed piece
//! boops its neighbours one cell away (kittens cannot move cats); three of a
//! player's pieces in a row graduate into cats in hand; three cats in a row,
//! or eight cats on the board, wins.
//!
//! # Architecture
//!
//! - **Board**: the grid of [`PieceKind`] cells
//! - **Rules**: pure planning functions ([`rules::plan`], [`rules::scan`])
//! - **GameState**: one match, advanced by [`GameState::place`] and
//!   [`GameState::choose`]
//! - **Invariants**: bookkeeping properties checked after each transition
//!
//! # Example
//!
//! ```
//! use boop_rules::{GameState, PieceKind, Phase, Position};
//!
//! let mut game = GameState::new();
//! game.place(Position::new(3, 3), PieceKind::P1Kitten)?;
//! assert_eq!(game.turn_number(), 1);
//! assert_eq!(game.phase(), &Phase::AwaitingMove);
//! # Ok::<(), boop_rules::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod error;
mod piece;
mod position;
mod state;

pub mod invariants;
pub mod rules;

pub use board::Board;
pub use engine::MoveReport;
pub use error::{MoveError, StateError};
pub use piece::{CodeError, PieceKind, Player, Rank};
pub use position::{BOARD_SIZE, Direction, Position};
pub use rules::{BoopOutcome, PendingLine};
pub use state::{BoopMovement, GameState, PIECES_PER_PLAYER, Phase, Placement, PlayerStock};
