//! The mutable record of one match.

use crate::board::Board;
use crate::error::StateError;
use crate::piece::{PieceKind, Player, Rank};
use crate::position::Position;
use crate::rules::PendingLine;
use serde::{Deserialize, Serialize, Serializer};
use tracing::instrument;

/// Pieces each player owns for the whole game.
pub const PIECES_PER_PLAYER: u8 = 8;

/// A player's pieces: what is in hand and how many are on the board.
///
/// `kittens + cats + placed` is always [`PIECES_PER_PLAYER`]. Promotion moves
/// units between "on board" and "in hand as cat"; it never creates or
/// destroys one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStock {
    pub(crate) kittens: u8,
    pub(crate) cats: u8,
    pub(crate) placed: u8,
}

impl PlayerStock {
    /// The opening stock: every piece is a kitten in hand.
    pub fn fresh() -> Self {
        Self {
            kittens: PIECES_PER_PLAYER,
            cats: 0,
            placed: 0,
        }
    }

    /// Builds a stock from explicit counts.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] unless the counts add up to
    /// [`PIECES_PER_PLAYER`].
    pub fn new(kittens: u8, cats: u8, placed: u8) -> Result<Self, StateError> {
        let stock = Self {
            kittens,
            cats,
            placed,
        };
        if stock.total() != u16::from(PIECES_PER_PLAYER) {
            return Err(StateError::new(format!(
                "stock {kittens}+{cats}+{placed} does not add up to {PIECES_PER_PLAYER}"
            )));
        }
        Ok(stock)
    }

    /// Kittens in hand.
    pub fn kittens(&self) -> u8 {
        self.kittens
    }

    /// Cats in hand.
    pub fn cats(&self) -> u8 {
        self.cats
    }

    /// Pieces currently on the board.
    pub fn placed(&self) -> u8 {
        self.placed
    }

    /// Pieces of `rank` in hand.
    pub fn in_hand(&self, rank: Rank) -> u8 {
        match rank {
            Rank::Kitten => self.kittens,
            Rank::Cat => self.cats,
        }
    }

    /// Sum of every count. Always [`PIECES_PER_PLAYER`] for a valid stock.
    pub fn total(&self) -> u16 {
        u16::from(self.kittens) + u16::from(self.cats) + u16::from(self.placed)
    }

    fn hand_mut(&mut self, rank: Rank) -> &mut u8 {
        match rank {
            Rank::Kitten => &mut self.kittens,
            Rank::Cat => &mut self.cats,
        }
    }

    /// Moves one piece of `rank` from hand to board.
    pub(crate) fn take(&mut self, rank: Rank) {
        let hand = self.hand_mut(rank);
        *hand = hand.saturating_sub(1);
        self.placed += 1;
    }

    /// Moves one piece of `rank` from board back to hand.
    pub(crate) fn return_to_hand(&mut self, rank: Rank) {
        *self.hand_mut(rank) += 1;
        self.placed = self.placed.saturating_sub(1);
    }

    /// Takes a graduated line of three off the board as cats in hand.
    pub(crate) fn graduate(&mut self) {
        self.cats += 3;
        self.placed = self.placed.saturating_sub(3);
    }
}

impl Default for PlayerStock {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Where the turn currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Phase {
    /// The active player must place a piece.
    AwaitingMove,
    /// The active player completed several lines and must pick one.
    AwaitingLineChoice {
        /// Lines on offer, in scan order.
        lines: Vec<PendingLine>,
    },
    /// The active player has all pieces on the board and must take one back.
    AwaitingReturnChoice,
    /// The game is over.
    Concluded {
        /// Who won.
        winner: Player,
    },
}

impl Phase {
    /// Short camelCase name of the phase, used on the wire and in errors.
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

/// The last piece placed, kept so clients can highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct Placement {
    /// Cell the piece was placed on.
    pub position: Position,
    /// The piece placed.
    pub piece: PieceKind,
}

/// A piece that slid across the board during the last boop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoopMovement {
    /// Cell the piece left.
    pub position: Position,
    /// Cell it ended on.
    pub final_position: Position,
    /// The piece that moved.
    pub tile: PieceKind,
}

/// Complete state of one match.
///
/// Created empty at session start and mutated only through the engine's
/// transition methods ([`GameState::place`], [`GameState::choose`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) turn_number: u32,
    pub(crate) board: Board,
    pub(crate) p1: PlayerStock,
    pub(crate) p2: PlayerStock,
    pub(crate) phase: Phase,
    pub(crate) placed: Option<Placement>,
    pub(crate) boop_movement: Vec<BoopMovement>,
}

impl GameState {
    /// Creates a new game: empty board, eight kittens each, player one to
    /// move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            turn_number: 0,
            board: Board::new(),
            p1: PlayerStock::fresh(),
            p2: PlayerStock::fresh(),
            phase: Phase::AwaitingMove,
            placed: None,
            boop_movement: Vec::new(),
        }
    }

    /// Builds a game awaiting a move from an arranged board.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if a player's `placed` count does not match
    /// their pieces on the board.
    #[instrument(skip(board, p1, p2))]
    pub fn from_parts(
        turn_number: u32,
        board: Board,
        p1: PlayerStock,
        p2: PlayerStock,
    ) -> Result<Self, StateError> {
        for (player, stock) in [(Player::One, &p1), (Player::Two, &p2)] {
            let on_board = board.count_of(player);
            if usize::from(stock.placed()) != on_board {
                return Err(StateError::new(format!(
                    "{player} has {on_board} pieces on the board but {} placed",
                    stock.placed()
                )));
            }
        }

        Ok(Self {
            turn_number,
            board,
            p1,
            p2,
            phase: Phase::AwaitingMove,
            placed: None,
            boop_movement: Vec::new(),
        })
    }

    /// Number of completed turns.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// The player whose input is accepted: player one on even turns.
    pub fn active_player(&self) -> Player {
        Player::for_turn(self.turn_number)
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A player's stock.
    pub fn stock(&self, player: Player) -> &PlayerStock {
        match player {
            Player::One => &self.p1,
            Player::Two => &self.p2,
        }
    }

    pub(crate) fn stock_mut(&mut self, player: Player) -> &mut PlayerStock {
        match player {
            Player::One => &mut self.p1,
            Player::Two => &mut self.p2,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The winner, once the game has concluded.
    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Concluded { winner } => Some(winner),
            _ => None,
        }
    }

    /// Returns true once the game is over.
    pub fn is_concluded(&self) -> bool {
        self.winner().is_some()
    }

    /// Lines waiting for the active player's choice, if any.
    pub fn pending_lines(&self) -> &[PendingLine] {
        match &self.phase {
            Phase::AwaitingLineChoice { lines } => lines,
            _ => &[],
        }
    }

    /// The last placement, if any.
    pub fn last_placement(&self) -> Option<&Placement> {
        self.placed.as_ref()
    }

    /// Pieces that slid during the last placement.
    pub fn boop_movements(&self) -> &[BoopMovement] {
        &self.boop_movement
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

// Flattened for the browser client, with the derived fields it expects.
impl Serialize for GameState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            turn_number: u32,
            player_turn: Player,
            board: &'a Board,
            p1: &'a PlayerStock,
            p2: &'a PlayerStock,
            phase: &'a Phase,
            three_choices: Vec<Position>,
            winner: u8,
            placed: Option<&'a Placement>,
            boop_movement: &'a [BoopMovement],
        }

        Wire {
            turn_number: self.turn_number,
            player_turn: self.active_player(),
            board: &self.board,
            p1: &self.p1,
            p2: &self.p2,
            phase: &self.phase,
            three_choices: self.pending_lines().iter().map(|line| line.choice).collect(),
            winner: self.winner().map_or(0, Player::code),
            placed: self.placed.as_ref(),
            boop_movement: &self.boop_movement,
        }
        .serialize(serializer)
    }
}
