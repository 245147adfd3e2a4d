//! The 6x6 board of piece cells.

use crate::error::MoveError;
use crate::piece::{PieceKind, Player, Rank};
use crate::position::{BOARD_SIZE, Position};
use serde::{Deserialize, Serialize};

const SIZE: usize = BOARD_SIZE as usize;

/// 6x6 grid of cells, stored row-major (`cells[y][x]`).
///
/// Serializes as a 6x6 array of piece codes, the shape the browser client
/// renders directly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[PieceKind; SIZE]; SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of `pos`, or `None` if it is off the board.
    pub fn get(&self, pos: Position) -> Option<PieceKind> {
        if !pos.is_on_board() {
            return None;
        }
        Some(self.cells[usize::from(pos.y)][usize::from(pos.x)])
    }

    /// Writes `kind` into `pos`, overwriting whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidPosition`] if `pos` is off the board.
    pub fn set(&mut self, pos: Position, kind: PieceKind) -> Result<(), MoveError> {
        if !pos.is_on_board() {
            return Err(MoveError::InvalidPosition(pos));
        }
        self.cells[usize::from(pos.y)][usize::from(pos.x)] = kind;
        Ok(())
    }

    /// Writes `kind` into `pos`. Off-board positions are ignored.
    pub(crate) fn put(&mut self, pos: Position, kind: PieceKind) {
        if pos.is_on_board() {
            self.cells[usize::from(pos.y)][usize::from(pos.x)] = kind;
        }
    }

    /// Empties `pos` and returns what it held.
    pub(crate) fn take(&mut self, pos: Position) -> PieceKind {
        match self.get(pos) {
            Some(kind) => {
                self.cells[usize::from(pos.y)][usize::from(pos.x)] = PieceKind::Empty;
                kind
            }
            None => PieceKind::Empty,
        }
    }

    /// Returns true if `pos` is on the board and holds no piece.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Some(PieceKind::Empty)
    }

    /// Iterates over every occupied cell in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, PieceKind)> + '_ {
        Position::all().filter_map(move |pos| match self.get(pos) {
            Some(kind) if !kind.is_empty() => Some((pos, kind)),
            _ => None,
        })
    }

    /// Positions of every piece owned by `player`, in row-major order.
    pub fn positions_of(&self, player: Player) -> Vec<Position> {
        self.pieces()
            .filter(|(_, kind)| kind.owner() == Some(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of pieces `player` has on the board.
    pub fn count_of(&self, player: Player) -> usize {
        self.pieces()
            .filter(|(_, kind)| kind.owner() == Some(player))
            .count()
    }

    /// Number of `player`'s pieces of the given rank on the board.
    pub fn count_rank(&self, player: Player, rank: Rank) -> usize {
        let wanted = PieceKind::of(player, rank);
        self.pieces().filter(|(_, kind)| *kind == wanted).count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                let symbol = match kind {
                    PieceKind::Empty => '.',
                    PieceKind::P1Kitten => 'k',
                    PieceKind::P1Cat => 'C',
                    PieceKind::P2Kitten => 'x',
                    PieceKind::P2Cat => 'X',
                };
                write!(f, "{symbol}")?;
                if x + 1 < SIZE {
                    write!(f, " ")?;
                }
            }
            if y + 1 < SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
