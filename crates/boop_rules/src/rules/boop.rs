//! Push ("boop") planning.
//!
//! Placing a piece pushes every adjacent piece one cell directly away from
//! it. Planning is a pure function of the board right after placement; the
//! engine commits the resulting outcomes in a separate step. Pieces moved by
//! a boop never boop anything themselves.

use crate::board::Board;
use crate::piece::PieceKind;
use crate::position::{Direction, Position};
use strum::IntoEnumIterator;
use tracing::{instrument, trace};

/// A piece adjacent to a freshly placed one, about to be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boop {
    /// Where the pushed piece currently sits.
    pub origin: Position,
    /// Direction of the push, pointing away from the placed piece.
    pub direction: Direction,
    /// The piece being pushed.
    pub piece: PieceKind,
    /// The piece whose placement caused the push.
    pub booped_by: PieceKind,
}

impl Boop {
    /// Returns true if the weight rule shields this piece: a kitten cannot
    /// move a cat.
    pub fn resisted(&self) -> bool {
        self.piece.is_cat() && self.booped_by.is_kitten()
    }

    /// Resolves the push against `board`, or `None` if the piece resists.
    pub fn resolve(&self, board: &Board) -> Option<BoopOutcome> {
        if self.resisted() {
            return None;
        }

        let outcome = match self.origin.step(self.direction) {
            None => BoopOutcome::Ejected {
                from: self.origin,
                piece: self.piece,
            },
            Some(to) if board.is_empty(to) => BoopOutcome::Moved {
                from: self.origin,
                to,
                piece: self.piece,
            },
            Some(_) => BoopOutcome::Blocked {
                at: self.origin,
                piece: self.piece,
            },
        };
        Some(outcome)
    }
}

/// What a single boop does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoopOutcome {
    /// The piece slides one cell.
    Moved {
        /// Cell it leaves.
        from: Position,
        /// Cell it lands on.
        to: Position,
        /// The piece that moved.
        piece: PieceKind,
    },
    /// The piece is pushed off the edge and goes back to its owner's hand.
    Ejected {
        /// Cell it leaves.
        from: Position,
        /// The piece that was ejected.
        piece: PieceKind,
    },
    /// Another piece sits behind it; nothing happens.
    Blocked {
        /// Cell it stays on.
        at: Position,
        /// The piece that stayed.
        piece: PieceKind,
    },
}

/// Collects a push candidate for every occupied neighbour of `placed_at`.
#[instrument(level = "trace", skip(board))]
pub fn candidates(board: &Board, placed_at: Position) -> Vec<Boop> {
    let booped_by = board.get(placed_at).unwrap_or_default();

    Direction::iter()
        .filter_map(|direction| {
            let origin = placed_at.step(direction)?;
            let piece = board.get(origin)?;
            (!piece.is_empty()).then_some(Boop {
                origin,
                direction,
                piece,
                booped_by,
            })
        })
        .collect()
}

/// Plans every push caused by the piece at `placed_at`.
///
/// Each candidate is resolved against the same snapshot. Destinations lie two
/// cells from the placed piece and origins one cell away, so no outcome can
/// depend on another.
#[instrument(level = "trace", skip(board))]
pub fn plan(board: &Board, placed_at: Position) -> Vec<BoopOutcome> {
    let outcomes: Vec<_> = candidates(board, placed_at)
        .iter()
        .filter_map(|boop| boop.resolve(board))
        .collect();
    trace!(count = outcomes.len(), "Planned boops");
    outcomes
}
