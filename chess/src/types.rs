//! Core chess types

pub use chesslab_base::types::{
    CastlingRights, CastlingSide, Color, ColorParseError, Coord, CoordParseError, File,
    HomePiece, Piece, PieceKind, PieceParseError, Rank,
};

use std::fmt;

/// Result of a completed move, seen from the side that moves next
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// Nothing special, the game goes on
    Continue,
    /// The side to move is in check but has legal moves
    Check,
    /// The side to move is checkmated, the given color wins
    Checkmate(Color),
    /// The side to move is not in check and has no legal moves
    Stalemate,
    /// A pawn reached the last rank on the given square and waits for a promotion choice
    ///
    /// The turn does not pass until the choice is resolved.
    AwaitingPromotion(Coord),
}

impl MoveOutcome {
    /// Returns `true` if the game cannot continue after this outcome
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Checkmate(_) | Self::Stalemate)
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Continue => write!(f, "game continues"),
            Self::Check => write!(f, "check"),
            Self::Checkmate(Color::White) => write!(f, "checkmate, White wins"),
            Self::Checkmate(Color::Black) => write!(f, "checkmate, Black wins"),
            Self::Stalemate => write!(f, "stalemate"),
            Self::AwaitingPromotion(c) => write!(f, "promotion pending on {}", c),
        }
    }
}

/// How a finished game ended
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Finish {
    Checkmate { winner: Color },
    Stalemate,
    DrawAgreed,
}

impl Finish {
    /// Returns the winner, or `None` for a draw
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Self::Checkmate { winner } => Some(winner),
            Self::Stalemate | Self::DrawAgreed => None,
        }
    }

    /// Result of the game from the point of view of `color`
    #[inline]
    pub fn result_for(&self, color: Color) -> GameResult {
        match self.winner() {
            Some(w) if w == color => GameResult::Win,
            Some(_) => GameResult::Loss,
            None => GameResult::Draw,
        }
    }
}

/// Result of a finished game for one player
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Win => "Win",
            Self::Loss => "Loss",
            Self::Draw => "Draw",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}
