//! Turn transitions: placement, boops, graduation and win detection.
//!
//! Every method validates fully before it mutates anything, so a rejected
//! input leaves the game exactly as it was.

use crate::error::MoveError;
use crate::invariants::assert_invariants;
use crate::piece::{PieceKind, Player, Rank};
use crate::position::Position;
use crate::rules::{self, BoopOutcome, PendingLine};
use crate::state::{BoopMovement, GameState, PIECES_PER_PLAYER, Phase, Placement};
use tracing::{debug, info, instrument};

const AWAITING_CHOICE: &str = "awaitingLineChoice or awaitingReturnChoice";

/// What a placement did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Every push the placement caused, blocked ones included.
    pub boops: Vec<BoopOutcome>,
    /// The line promoted automatically, if exactly one was completed.
    pub graduated: Option<[Position; 3]>,
}

impl GameState {
    /// Places a piece for the active player and resolves the whole move.
    ///
    /// After the piece lands, adjacent pieces are booped, completed lines are
    /// checked for a win, then graduated, and finally the stock-exhaustion
    /// rule decides whether the player must take a piece back.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveError`] without touching the game if the phase is not
    /// [`Phase::AwaitingMove`], the position is off the board or occupied,
    /// the piece does not belong to the active player, or none are in hand.
    #[instrument(skip(self), fields(turn = self.turn_number, player = %self.active_player()))]
    pub fn place(&mut self, position: Position, kind: PieceKind) -> Result<MoveReport, MoveError> {
        self.expect_phase(&Phase::AwaitingMove)?;

        if !position.is_on_board() {
            return Err(MoveError::InvalidPosition(position));
        }

        let player = self.active_player();
        let rank = match (kind.owner(), kind.rank()) {
            (Some(owner), Some(rank)) if owner == player => rank,
            _ => return Err(MoveError::InvalidPieceKind(kind)),
        };

        if !self.board.is_empty(position) {
            return Err(MoveError::CellOccupied(position));
        }

        if self.stock(player).in_hand(rank) == 0 {
            return Err(MoveError::NoStock(kind));
        }

        self.stock_mut(player).take(rank);
        self.board.put(position, kind);
        self.placed = Some(Placement::new(position, kind));

        let boops = rules::plan(&self.board, position);
        self.boop_movement = self.apply_boops(&boops);
        debug!(boops = boops.len(), board = %self.board, "Placement resolved");

        let graduated = self.settle(player);
        assert_invariants(self);

        Ok(MoveReport { boops, graduated })
    }

    /// Submits a position for whichever choice the phase is waiting on.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::WrongPhase`] while awaiting a move,
    /// [`MoveError::GameOver`] once concluded, or the error of the
    /// underlying choice.
    #[instrument(skip(self), fields(turn = self.turn_number, phase = self.phase.label()))]
    pub fn choose(&mut self, choice: Position) -> Result<(), MoveError> {
        match self.phase {
            Phase::AwaitingLineChoice { .. } => self.choose_line(choice).map(|_| ()),
            Phase::AwaitingReturnChoice => self.choose_return(choice).map(|_| ()),
            Phase::AwaitingMove => Err(MoveError::WrongPhase {
                expected: AWAITING_CHOICE,
                actual: self.phase.label(),
            }),
            Phase::Concluded { .. } => Err(MoveError::GameOver),
        }
    }

    /// Graduates the pending line selected by `choice`; the other lines are
    /// discarded and the turn ends.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidLineChoice`] if `choice` is not one of the
    /// offered choice positions.
    #[instrument(skip(self), fields(turn = self.turn_number))]
    pub fn choose_line(&mut self, choice: Position) -> Result<[Position; 3], MoveError> {
        self.expect_phase(&Phase::AwaitingLineChoice { lines: Vec::new() })?;

        let line = self
            .pending_lines()
            .iter()
            .find(|line| line.choice == choice)
            .copied()
            .ok_or(MoveError::InvalidLineChoice(choice))?;

        let player = self.active_player();
        self.boop_movement.clear();
        self.graduate(player, &line);
        self.end_turn();
        assert_invariants(self);

        Ok(line.cells)
    }

    /// Returns one of the active player's pieces to their hand, keeping its
    /// rank, and ends the turn.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidReturnChoice`] if `choice` does not hold
    /// one of the active player's pieces.
    #[instrument(skip(self), fields(turn = self.turn_number))]
    pub fn choose_return(&mut self, choice: Position) -> Result<PieceKind, MoveError> {
        self.expect_phase(&Phase::AwaitingReturnChoice)?;

        let player = self.active_player();
        let kind = self
            .board
            .get(choice)
            .filter(|kind| kind.owner() == Some(player))
            .ok_or(MoveError::InvalidReturnChoice(choice))?;
        let Some(rank) = kind.rank() else {
            return Err(MoveError::InvalidReturnChoice(choice));
        };

        self.boop_movement.clear();
        self.board.take(choice);
        self.stock_mut(player).return_to_hand(rank);
        info!(%player, %choice, %kind, "Piece returned to hand");
        self.end_turn();
        assert_invariants(self);

        Ok(kind)
    }

    /// Checks that the game is in the same phase variant as `expected`;
    /// variant payloads are not compared.
    fn expect_phase(&self, expected: &Phase) -> Result<(), MoveError> {
        match &self.phase {
            Phase::Concluded { .. } => Err(MoveError::GameOver),
            phase if std::mem::discriminant(phase) == std::mem::discriminant(expected) => Ok(()),
            phase => Err(MoveError::WrongPhase {
                expected: expected.label(),
                actual: phase.label(),
            }),
        }
    }

    /// Commits planned boops. Ejected pieces go back to their owner's hand.
    fn apply_boops(&mut self, outcomes: &[BoopOutcome]) -> Vec<BoopMovement> {
        let mut movements = Vec::new();

        for outcome in outcomes {
            match *outcome {
                BoopOutcome::Moved { from, to, piece } => {
                    self.board.take(from);
                    self.board.put(to, piece);
                    movements.push(BoopMovement {
                        position: from,
                        final_position: to,
                        tile: piece,
                    });
                }
                BoopOutcome::Ejected { from, piece } => {
                    self.board.take(from);
                    if let (Some(owner), Some(rank)) = (piece.owner(), piece.rank()) {
                        self.stock_mut(owner).return_to_hand(rank);
                    }
                }
                BoopOutcome::Blocked { .. } => {}
            }
        }

        movements
    }

    /// Decides the phase after a placement. Returns the line graduated
    /// automatically, if any.
    fn settle(&mut self, player: Player) -> Option<[Position; 3]> {
        let lines = rules::pending_lines(&self.board, player);

        // Three cats in a row ends the game before anything graduates.
        if let Some(line) = lines
            .iter()
            .find(|line| rules::is_all_cats(&self.board, &line.cells))
        {
            info!(%player, cells = ?line.cells, "Three cats in a row, game over");
            self.phase = Phase::Concluded { winner: player };
            return None;
        }

        match lines.len() {
            0 => {
                self.check_exhaustion(player);
                None
            }
            1 => {
                let line = lines[0];
                self.graduate(player, &line);
                self.end_turn();
                Some(line.cells)
            }
            _ => {
                info!(%player, count = lines.len(), "Several lines completed, awaiting choice");
                self.phase = Phase::AwaitingLineChoice { lines };
                None
            }
        }
    }

    /// With every piece on the board, the player either wins on eight cats
    /// or must take a piece back.
    fn check_exhaustion(&mut self, player: Player) {
        if self.stock(player).placed() < PIECES_PER_PLAYER {
            self.end_turn();
            return;
        }

        let cats = self.board.count_rank(player, Rank::Cat);
        if cats >= usize::from(PIECES_PER_PLAYER) {
            info!(%player, cats, "Every piece on the board is a cat, game over");
            self.phase = Phase::Concluded { winner: player };
        } else {
            debug!(%player, cats, "All pieces placed, awaiting return choice");
            self.phase = Phase::AwaitingReturnChoice;
        }
    }

    fn graduate(&mut self, player: Player, line: &PendingLine) {
        for cell in line.cells {
            self.board.take(cell);
        }
        self.stock_mut(player).graduate();
        info!(%player, cells = ?line.cells, "Line graduated into cats");
    }

    fn end_turn(&mut self) {
        self.phase = Phase::AwaitingMove;
        self.turn_number += 1;
    }
}
