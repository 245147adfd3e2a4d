//! Board coordinates and compass directions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

/// Width and height of the square board.
pub const BOARD_SIZE: u8 = 6;

/// A cell on the board, addressed by column `x` and row `y`.
///
/// Positions arriving from clients may lie off the board; use
/// [`Position::is_on_board`] before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Position {
    /// Column, 0 is the left edge.
    pub x: u8,
    /// Row, 0 is the top edge.
    pub y: u8,
}

impl Position {
    /// Returns true if both coordinates lie in `0..BOARD_SIZE`.
    pub fn is_on_board(self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// Returns the neighbouring cell in `direction`, or `None` if it would
    /// fall off the board.
    #[instrument(level = "trace")]
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.offset();
        let x = i16::from(self.x) + i16::from(dx);
        let y = i16::from(self.y) + i16::from(dy);
        let size = i16::from(BOARD_SIZE);

        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Position::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Squared distance from the board centre, doubled on each axis so it
    /// stays integral.
    pub fn distance_from_centre(self) -> u16 {
        let dx = 2 * i16::from(self.x) - i16::from(BOARD_SIZE - 1);
        let dy = 2 * i16::from(self.y) - i16::from(BOARD_SIZE - 1);
        (dx * dx + dy * dy) as u16
    }

    /// Every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Position::new(x, y)))
    }
}

// Row-major, so sorted positions read like the board scan.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass offsets around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Up and to the left.
    TopLeft,
    /// Straight up.
    Above,
    /// Up and to the right.
    TopRight,
    /// Straight right.
    Right,
    /// Down and to the right.
    BottomRight,
    /// Straight down.
    Below,
    /// Down and to the left.
    BottomLeft,
    /// Straight left.
    Left,
}

impl Direction {
    /// The `(dx, dy)` offset of this direction. `y` grows downwards.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::TopLeft => (-1, -1),
            Direction::Above => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Below => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The direction pointing the opposite way.
    pub fn reverse(self) -> Self {
        match self {
            Direction::TopLeft => Direction::BottomRight,
            Direction::Above => Direction::Below,
            Direction::TopRight => Direction::BottomLeft,
            Direction::Right => Direction::Left,
            Direction::BottomRight => Direction::TopLeft,
            Direction::Below => Direction::Above,
            Direction::BottomLeft => Direction::TopRight,
            Direction::Left => Direction::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_step_stays_on_board() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Above), None);
        assert_eq!(corner.step(Direction::BottomRight), Some(Position::new(1, 1)));

        let far = Position::new(5, 5);
        assert_eq!(far.step(Direction::Right), None);
        assert_eq!(far.step(Direction::TopLeft), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_every_direction_is_distinct_and_reversible() {
        let offsets: Vec<_> = Direction::iter().map(Direction::offset).collect();
        assert_eq!(offsets.len(), 8);
        for (i, a) in offsets.iter().enumerate() {
            assert_ne!(*a, (0, 0));
            assert!(offsets[i + 1..].iter().all(|b| b != a));
        }
        for direction in Direction::iter() {
            let (dx, dy) = direction.offset();
            assert_eq!(direction.reverse().offset(), (-dx, -dy));
        }
    }

    #[test]
    fn test_all_is_row_major() {
        let cells: Vec<_> = Position::all().collect();
        assert_eq!(cells.len(), 36);
        assert_eq!(cells[1], Position::new(1, 0));
        assert_eq!(cells[6], Position::new(0, 1));
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_off_board_positions() {
        assert!(Position::new(5, 5).is_on_board());
        assert!(!Position::new(6, 0).is_on_board());
        assert!(!Position::new(0, 200).is_on_board());
    }
}
