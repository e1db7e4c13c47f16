use crate::types::{CastlingSide, Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move from the `e2e4` form
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
}

/// Move kind, as determined by the moving piece and the position it is made in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Non-pawn move or capture (except castling)
    Simple,
    /// Single pawn move, either non-capture or capture, not reaching the last rank
    PawnSimple,
    /// Double pawn move from the pawn's home rank
    PawnDouble,
    /// En passant capture
    Enpassant,
    /// Two-column king shift
    Castling(CastlingSide),
    /// Pawn move reaching the last rank
    Promote,
}

/// Chess move, given by its source and destination squares
///
/// The move carries no extra information about its kind, it is derived from the position when
/// the move is made. Promotion choice is supplied separately.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move { src, dst }
    }

    /// Row difference between the destination and the source
    #[inline]
    pub fn d_row(&self) -> isize {
        self.dst.row() as isize - self.src.row() as isize
    }

    /// Column difference between the destination and the source
    #[inline]
    pub fn d_col(&self) -> isize {
        self.dst.col() as isize - self.src.col() as isize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(MoveParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(MoveParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(MoveParseError::BadDst)?;
        Ok(Move { src, dst })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_parse() {
        let mv = Move::from_str("e2e4").unwrap();
        assert_eq!(mv.src, Coord::from_parts(File::E, Rank::R2));
        assert_eq!(mv.dst, Coord::from_parts(File::E, Rank::R4));
        assert_eq!(mv.d_row(), -2);
        assert_eq!(mv.d_col(), 0);
        assert_eq!(mv.to_string(), "e2e4");

        assert_eq!(Move::from_str("e2e"), Err(MoveParseError::BadLength));
        assert_eq!(
            Move::from_str("i2e4"),
            Err(MoveParseError::BadSrc(CoordParseError::UnexpectedFileChar(
                'i'
            )))
        );
        assert_eq!(
            Move::from_str("e2e9"),
            Err(MoveParseError::BadDst(CoordParseError::UnexpectedRankChar(
                '9'
            )))
        );
    }
}
