//! Three-in-a-row detection.

use crate::board::Board;
use crate::piece::Player;
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// The four orientations a line can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Top-left to bottom-right.
    Diagonal,
    /// Bottom-left to top-right.
    AntiDiagonal,
}

impl Axis {
    /// The direction walking forwards along the axis.
    pub fn forward(self) -> Direction {
        match self {
            Axis::Horizontal => Direction::Right,
            Axis::Vertical => Direction::Below,
            Axis::Diagonal => Direction::BottomRight,
            Axis::AntiDiagonal => Direction::TopRight,
        }
    }
}

/// A completed line of three belonging to the active player, waiting to be
/// graduated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLine {
    /// The three cells, in order along the line.
    pub cells: [Position; 3],
    /// The cell the player submits to pick this line.
    pub choice: Position,
}

impl PendingLine {
    /// Builds a pending line, keyed by its outward-most cell.
    pub fn new(cells: [Position; 3]) -> Self {
        Self {
            cells,
            choice: outward_most(&cells),
        }
    }

    /// Returns true if `pos` is one of the line's cells.
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// The end cell farther from the board centre. Ties go to the end that comes
/// first in row-major order.
fn outward_most(cells: &[Position; 3]) -> Position {
    let [start, _, end] = *cells;
    let (first, second) = if start <= end { (start, end) } else { (end, start) };
    if second.distance_from_centre() > first.distance_from_centre() {
        second
    } else {
        first
    }
}

/// Returns the line centred on `middle` along `axis`, if all three cells are
/// occupied by the same player.
pub fn line_through(board: &Board, middle: Position, axis: Axis) -> Option<(Player, [Position; 3])> {
    let before = middle.step(axis.forward().reverse())?;
    let after = middle.step(axis.forward())?;

    let owner = board.get(middle)?.owner()?;
    let centre = board.get(middle)?;
    let same = |pos| board.get(pos).is_some_and(|kind| kind.same_category(centre));

    (same(before) && same(after)).then_some((owner, [before, middle, after]))
}

/// Finds every line of three on the board, for both players.
///
/// Each cell is tried as the middle of a line on all four axes. Lines are
/// deduplicated by their set of cells and returned in scan order.
#[instrument(level = "trace", skip(board))]
pub fn scan(board: &Board) -> Vec<(Player, [Position; 3])> {
    let mut seen = BTreeSet::new();
    let mut lines = Vec::new();

    for middle in Position::all() {
        for axis in Axis::iter() {
            if let Some((owner, cells)) = line_through(board, middle, axis) {
                let mut key = cells;
                key.sort();
                if seen.insert(key) {
                    lines.push((owner, cells));
                }
            }
        }
    }

    lines
}

/// The lines belonging to `player`. Opponent lines left over from pushes are
/// ignored.
///
/// Each line gets its own choice cell: the outward-most end when free, else
/// the other end, else the middle.
#[instrument(skip(board))]
pub fn pending_lines(board: &Board, player: Player) -> Vec<PendingLine> {
    let mut lines: Vec<_> = scan(board)
        .into_iter()
        .filter(|(owner, _)| *owner == player)
        .map(|(_, cells)| PendingLine::new(cells))
        .collect();
    if lines.len() > 1 {
        assign_choices(&mut lines);
    }
    if !lines.is_empty() {
        debug!(%player, count = lines.len(), "Found completed lines");
    }
    lines
}

/// Candidate choice cells of a line, most preferred first.
fn preferences(line: &PendingLine) -> [Position; 3] {
    let [start, middle, end] = line.cells;
    let other = if line.choice == start { end } else { start };
    [line.choice, other, middle]
}

/// Rekeys `lines` so no two share a choice cell. Earlier lines are moved off
/// a cell only when a later line has no free cell left.
fn assign_choices(lines: &mut [PendingLine]) {
    let candidates: Vec<_> = lines.iter().map(preferences).collect();
    let mut holders = BTreeMap::new();

    for index in 0..lines.len() {
        if !claim(index, &candidates, &mut holders, &mut BTreeSet::new()) {
            debug!(cells = ?lines[index].cells, "No free choice cell for line");
        }
    }

    for (cell, index) in holders {
        lines[index].choice = cell;
    }
}

/// Finds a choice cell for line `index`, displacing earlier holders along an
/// augmenting path when every candidate is taken.
fn claim(
    index: usize,
    candidates: &[[Position; 3]],
    holders: &mut BTreeMap<Position, usize>,
    visited: &mut BTreeSet<Position>,
) -> bool {
    let cells = candidates[index];
    if let Some(cell) = cells.into_iter().find(|cell| !holders.contains_key(cell)) {
        holders.insert(cell, index);
        return true;
    }

    for cell in cells {
        if !visited.insert(cell) {
            continue;
        }
        let Some(&holder) = holders.get(&cell) else {
            continue;
        };
        if claim(holder, candidates, holders, visited) {
            holders.insert(cell, index);
            return true;
        }
    }
    false
}

/// Returns true if every cell of the line holds a cat.
pub fn is_all_cats(board: &Board, cells: &[Position; 3]) -> bool {
    cells
        .iter()
        .all(|pos| board.get(*pos).is_some_and(|kind| kind.is_cat()))
}
