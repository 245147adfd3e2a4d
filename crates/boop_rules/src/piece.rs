//! Players, piece ranks and the contents of a board cell.

use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
///
/// Serialized as its numeric code (`1` or `2`); displayed as the
/// connection identifier (`player1` or `player2`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    /// Moves on even turns.
    #[strum(serialize = "player1")]
    One,
    /// Moves on odd turns.
    #[strum(serialize = "player2")]
    Two,
}

impl Player {
    /// Returns the opponent.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The player allowed to act on the given turn.
    pub fn for_turn(turn_number: u32) -> Self {
        if turn_number % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Numeric code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.code()
    }
}

impl TryFrom<u8> for Player {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(CodeError::new("player", other)),
        }
    }
}

/// The two ranks of piece a player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(into = "u8", try_from = "u8")]
#[strum(serialize_all = "lowercase")]
pub enum Rank {
    /// Starting rank. Cannot boop a cat.
    Kitten,
    /// Promoted rank. Three in a row wins.
    Cat,
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Kitten => 0,
            Rank::Cat => 1,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Rank::Kitten),
            1 => Ok(Rank::Cat),
            other => Err(CodeError::new("rank", other)),
        }
    }
}

/// Contents of a single board cell.
///
/// Wire codes follow the browser client: `0` empty, `1`/`2` player one's
/// kitten/cat, `8`/`9` player two's kitten/cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PieceKind {
    /// No piece.
    #[default]
    Empty,
    /// Player one's kitten.
    P1Kitten,
    /// Player one's cat.
    P1Cat,
    /// Player two's kitten.
    P2Kitten,
    /// Player two's cat.
    P2Cat,
}

impl PieceKind {
    /// The piece of the given rank owned by `player`.
    pub fn of(player: Player, rank: Rank) -> Self {
        match (player, rank) {
            (Player::One, Rank::Kitten) => PieceKind::P1Kitten,
            (Player::One, Rank::Cat) => PieceKind::P1Cat,
            (Player::Two, Rank::Kitten) => PieceKind::P2Kitten,
            (Player::Two, Rank::Cat) => PieceKind::P2Cat,
        }
    }

    /// The owning player (the piece's category), if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            PieceKind::Empty => None,
            PieceKind::P1Kitten | PieceKind::P1Cat => Some(Player::One),
            PieceKind::P2Kitten | PieceKind::P2Cat => Some(Player::Two),
        }
    }

    /// The rank, if the cell holds a piece.
    pub fn rank(self) -> Option<Rank> {
        match self {
            PieceKind::Empty => None,
            PieceKind::P1Kitten | PieceKind::P2Kitten => Some(Rank::Kitten),
            PieceKind::P1Cat | PieceKind::P2Cat => Some(Rank::Cat),
        }
    }

    /// Returns true for an empty cell.
    pub fn is_empty(self) -> bool {
        self == PieceKind::Empty
    }

    /// Returns true for either player's cat.
    pub fn is_cat(self) -> bool {
        self.rank() == Some(Rank::Cat)
    }

    /// Returns true for either player's kitten.
    pub fn is_kitten(self) -> bool {
        self.rank() == Some(Rank::Kitten)
    }

    /// Returns true if both cells hold pieces of the same player.
    pub fn same_category(self, other: PieceKind) -> bool {
        match (self.owner(), other.owner()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Numeric code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            PieceKind::Empty => 0,
            PieceKind::P1Kitten => 1,
            PieceKind::P1Cat => 2,
            PieceKind::P2Kitten => 8,
            PieceKind::P2Cat => 9,
        }
    }
}

impl From<PieceKind> for u8 {
    fn from(kind: PieceKind) -> Self {
        kind.code()
    }
}

impl TryFrom<u8> for PieceKind {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PieceKind::Empty),
            1 => Ok(PieceKind::P1Kitten),
            2 => Ok(PieceKind::P1Cat),
            8 => Ok(PieceKind::P2Kitten),
            9 => Ok(PieceKind::P2Cat),
            other => Err(CodeError::new("piece", other)),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.owner(), self.rank()) {
            (Some(player), Some(rank)) => write!(f, "{player} {rank}"),
            _ => write!(f, "empty"),
        }
    }
}

/// An unknown numeric code for a player, rank or piece.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_new::new)]
#[display("Unknown {} code {}", what, code)]
pub struct CodeError {
    what: &'static str,
    code: u8,
}

impl std::error::Error for CodeError {}
