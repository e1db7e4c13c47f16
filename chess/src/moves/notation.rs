//! Long algebraic notation used in the game history

use super::base::{Move, MoveKind};
use super::make::MoveEffect;
use crate::types::CastlingSide;

use std::fmt;

/// Wrapper to format a made move in history notation
///
/// # Example
///
/// ```
/// # use chesslab::{moves, Move, Position};
/// # use std::str::FromStr;
/// #
/// let mut pos = Position::initial();
/// let mv = Move::from_str("g1f3").unwrap();
/// let effect = moves::make_move_unchecked(&mut pos, mv, None).unwrap();
/// assert_eq!(moves::Notation::new(mv, &effect).to_string(), "Ng1f3");
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Notation {
    mv: Move,
    kind: MoveKind,
    letter: Option<char>,
    capture: bool,
}

impl Notation {
    pub fn new(mv: Move, effect: &MoveEffect) -> Notation {
        Notation {
            mv,
            kind: effect.kind,
            letter: effect.piece.kind.notation_letter(),
            capture: effect.is_capture(),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.kind {
            MoveKind::Castling(CastlingSide::King) => return write!(f, "O-O"),
            MoveKind::Castling(CastlingSide::Queen) => return write!(f, "O-O-O"),
            _ => {}
        }
        if let Some(letter) = self.letter {
            write!(f, "{}", letter)?;
        }
        write!(f, "{}", self.mv.src)?;
        if self.capture {
            write!(f, "x")?;
        }
        write!(f, "{}", self.mv.dst)
    }
}

/// Formats a made move in history notation
#[inline]
pub fn notation(mv: Move, effect: &MoveEffect) -> String {
    Notation::new(mv, effect).to_string()
}
