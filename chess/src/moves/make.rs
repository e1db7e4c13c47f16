use super::base::{Move, MoveKind};
use crate::board::Position;
use crate::castling;
use crate::types::{CastlingSide, Coord, HomePiece, Piece, PieceKind};

use chesslab_base::geometry;

/// What happened on the board when a move was made
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveEffect {
    pub kind: MoveKind,
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// Differs from the destination only for en passant
    pub captured_at: Option<Coord>,
    /// Square of a pawn that reached the last rank and still waits for a promotion choice
    pub pending_promotion: Option<Coord>,
}

impl MoveEffect {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

pub fn classify(pos: &Position, mv: Move, piece: Piece) -> MoveKind {
    match piece.kind {
        PieceKind::King if mv.d_row() == 0 && mv.d_col().abs() == 2 => {
            match CastlingSide::from_king_dst(mv.dst.file()) {
                Some(side) => MoveKind::Castling(side),
                None => MoveKind::Simple,
            }
        }
        PieceKind::Pawn => {
            if mv.dst.rank() == geometry::promote_rank(piece.color) {
                MoveKind::Promote
            } else if mv.d_row().abs() == 2 {
                MoveKind::PawnDouble
            } else if mv.d_col() != 0
                && pos.board.get(mv.dst).is_none()
                && pos.ep_target == Some(mv.dst)
            {
                MoveKind::Enpassant
            } else {
                MoveKind::PawnSimple
            }
        }
        _ => MoveKind::Simple,
    }
}

fn home_piece_at(piece: Piece, c: Coord) -> Option<HomePiece> {
    HomePiece::ALL
        .iter()
        .copied()
        .find(|&hp| hp.kind() == piece.kind && castling::home_square(piece.color, hp) == c)
}

/// Makes the move `mv` on `pos` without checking its legality
///
/// Without a valid `promote` target, a pawn reaching the last rank stays there and the turn
/// does not pass.
pub fn make_move_unchecked(
    pos: &mut Position,
    mv: Move,
    promote: Option<PieceKind>,
) -> Option<MoveEffect> {
    let piece = pos.board.get(mv.src)?;
    let color = piece.color;
    let kind = classify(pos, mv, piece);

    // Find out what gets captured
    let captured_at = match kind {
        MoveKind::Enpassant => Coord::from_row_col(mv.src.row(), mv.dst.col()),
        _ => Some(mv.dst),
    };
    let captured = captured_at.and_then(|c| pos.board.get(c));
    let captured_at = captured.and(captured_at);
    if let (Some(cap), Some(at)) = (captured, captured_at) {
        pos.board.set(at, None);
        if let Some(hp) = home_piece_at(cap, at) {
            pos.castling.mark_moved(cap.color, hp);
        }
    }

    // Move the piece, and the rook in case of castling
    pos.board.set(mv.src, None);
    pos.board.set(mv.dst, Some(piece));
    if let MoveKind::Castling(side) = kind {
        let rank = geometry::castling_rank(color);
        let rook_src = castling::home_square(color, side.rook());
        let rook = pos.board.get(rook_src);
        pos.board.set(rook_src, None);
        pos.board.set(Coord::from_parts(side.rook_dst(), rank), rook);
        pos.castling.mark_moved(color, side.rook());
    }

    // Update castling rights
    if let Some(hp) = home_piece_at(piece, mv.src) {
        pos.castling.mark_moved(color, hp);
    }
    if piece.kind == PieceKind::King {
        pos.castling.mark_moved(color, HomePiece::King);
    }

    pos.ep_target = match kind {
        MoveKind::PawnDouble => mv.src.try_shift(mv.d_row() / 2, 0),
        _ => None,
    };

    let mut pending_promotion = None;
    if kind == MoveKind::Promote {
        match promote.filter(PieceKind::is_promotion_target) {
            Some(target) => pos.board.set(mv.dst, Some(Piece::new(color, target))),
            None => pending_promotion = Some(mv.dst),
        }
    }

    if pending_promotion.is_none() {
        pos.side = color.inv();
    }

    Some(MoveEffect {
        kind,
        piece,
        captured,
        captured_at,
        pending_promotion,
    })
}
