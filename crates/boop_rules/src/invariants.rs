//! Bookkeeping invariants of a game.
//!
//! Invariants are logical properties that must hold after every transition.
//! The engine checks them in debug builds; tests check them directly.

use crate::piece::Player;
use crate::state::{GameState, PIECES_PER_PLAYER, Phase};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: every player's kittens, cats and placed pieces add up to eight.
pub struct StockConservation;

impl Invariant<GameState> for StockConservation {
    fn holds(state: &GameState) -> bool {
        [Player::One, Player::Two]
            .into_iter()
            .all(|player| state.stock(player).total() == u16::from(PIECES_PER_PLAYER))
    }

    fn description() -> &'static str {
        "Kittens, cats and placed pieces add up to eight for each player"
    }
}

/// Invariant: `placed` matches the pieces actually on the board.
pub struct PlacedMatchesBoard;

impl Invariant<GameState> for PlacedMatchesBoard {
    fn holds(state: &GameState) -> bool {
        [Player::One, Player::Two].into_iter().all(|player| {
            usize::from(state.stock(player).placed()) == state.board().count_of(player)
        })
    }

    fn description() -> &'static str {
        "Placed count matches the pieces on the board"
    }
}

/// Invariant: offered lines are real lines of the active player, and there
/// is more than one of them.
pub struct PendingLinesOwned;

impl Invariant<GameState> for PendingLinesOwned {
    fn holds(state: &GameState) -> bool {
        match state.phase() {
            Phase::AwaitingLineChoice { lines } => {
                let player = state.active_player();
                lines.len() > 1
                    && lines.iter().all(|line| {
                        line.cells.iter().all(|pos| {
                            state
                                .board()
                                .get(*pos)
                                .and_then(|kind| kind.owner())
                                == Some(player)
                        })
                    })
            }
            _ => true,
        }
    }

    fn description() -> &'static str {
        "Offered lines belong to the active player"
    }
}

/// Every game invariant as a composable set.
pub type GameInvariants = (StockConservation, PlacedMatchesBoard, PendingLinesOwned);

/// Asserts the game invariants in debug builds.
pub fn assert_invariants(state: &GameState) {
    debug_assert!(
        GameInvariants::check_all(state).is_ok(),
        "Game invariants violated: {:?}",
        GameInvariants::check_all(state)
    );
}
