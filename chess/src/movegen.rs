use crate::board::Position;
use crate::legal;
use crate::moves::Move;
use crate::types::{Color, Coord};

use std::slice;

use arrayvec::ArrayVec;
use derive_more::{Deref, DerefMut};
use log::warn;

/// List of moves, stored inline
///
/// No legal chess position has more than 256 moves, so the list never needs heap memory.
#[derive(Debug, Default, Clone, Deref, DerefMut)]
pub struct MoveList(ArrayVec<Move, 256>);

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        if self.0.try_push(m).is_err() {
            warn!("move list is full, dropping move {}", m);
        }
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        Vec::push(self, m);
    }
}

/// Pushes all the legal moves of color `color` into `dst`
pub fn gen_legal<P: MovePush>(pos: &Position, color: Color, dst: &mut P) {
    for (src, _) in pos.board.pieces_of(color) {
        for to in Coord::iter() {
            if legal::is_valid_move(pos, src, to, color) {
                dst.push(Move::new(src, to));
            }
        }
    }
}

pub fn all_legal_moves(pos: &Position, color: Color) -> MoveList {
    let mut res = MoveList::new();
    gen_legal(pos, color, &mut res);
    res
}

pub fn destinations(pos: &Position, src: Coord) -> Vec<Coord> {
    let color = match pos.board.get(src) {
        Some(p) => p.color,
        None => return Vec::new(),
    };
    Coord::iter()
        .filter(|&dst| legal::is_valid_move(pos, src, dst, color))
        .collect()
}

/// Returns `true` if color `color` has at least one legal move
pub fn has_any_legal_move(pos: &Position, color: Color) -> bool {
    pos.board.pieces_of(color).any(|(src, _)| {
        Coord::iter().any(|dst| legal::is_valid_move(pos, src, dst, color))
    })
}

pub fn is_checkmate(pos: &Position, color: Color) -> bool {
    pos.is_check(color) && !has_any_legal_move(pos, color)
}

pub fn is_stalemate(pos: &Position, color: Color) -> bool {
    !pos.is_check(color) && !has_any_legal_move(pos, color)
}
