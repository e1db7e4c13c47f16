use crate::board::Position;
use crate::moves::{self, Move};
use crate::types::{CastlingSide, Color, Coord, HomePiece, PieceKind};
use crate::{attack, between, castling};

use chesslab_base::geometry;

fn is_pawn_possible(pos: &Position, src: Coord, dst: Coord, color: Color) -> bool {
    let fwd = geometry::pawn_forward(color);
    let d_row = dst.row() as isize - src.row() as isize;
    let d_col = dst.col() as isize - src.col() as isize;
    let target = pos.board.get(dst);

    if d_col == 0 {
        if target.is_some() {
            return false;
        }
        if d_row == fwd {
            return true;
        }
        if d_row == 2 * fwd && src.rank() == geometry::pawn_home_rank(color) {
            return src
                .try_shift(fwd, 0)
                .map_or(false, |mid| pos.board.get(mid).is_none());
        }
        return false;
    }

    if d_col.abs() != 1 || d_row != fwd {
        return false;
    }
    match target {
        Some(p) => p.color != color,
        None => {
            // En passant: the target square must be the recorded one, and the pawn that
            // made the double step must still be beside us
            pos.ep_target == Some(dst)
                && Coord::from_row_col(src.row(), dst.col())
                    .and_then(|c| pos.board.get(c))
                    .map_or(false, |p| p.color != color && p.kind == PieceKind::Pawn)
        }
    }
}

fn is_king_possible(pos: &Position, src: Coord, dst: Coord, color: Color) -> bool {
    let d_row = src.row().abs_diff(dst.row());
    let d_col = src.col().abs_diff(dst.col());
    if d_row <= 1 && d_col <= 1 {
        return true;
    }
    if d_row != 0 || d_col != 2 || src != castling::home_square(color, HomePiece::King) {
        return false;
    }
    match CastlingSide::from_king_dst(dst.file()) {
        Some(side) => castling::can_castle(pos, color, side),
        None => false,
    }
}

/// Returns `true` if a piece of color `color` may go from `src` to `dst` by its movement rules
///
/// Whether the move leaves the mover's king in check is not considered here.
pub fn is_theoretically_possible(pos: &Position, src: Coord, dst: Coord, color: Color) -> bool {
    if src == dst {
        return false;
    }
    let piece = match pos.board.get(src) {
        Some(p) if p.color == color => p,
        _ => return false,
    };
    if let Some(target) = pos.board.get(dst) {
        if target.color == color {
            return false;
        }
    }

    let b = &pos.board;
    match piece.kind {
        PieceKind::Pawn => is_pawn_possible(pos, src, dst, color),
        PieceKind::Knight => {
            let d_row = src.row().abs_diff(dst.row());
            let d_col = src.col().abs_diff(dst.col());
            (d_row == 1 && d_col == 2) || (d_row == 2 && d_col == 1)
        }
        PieceKind::Bishop => between::is_bishop_valid(src, dst) && between::is_clear(b, src, dst),
        PieceKind::Rook => between::is_rook_valid(src, dst) && between::is_clear(b, src, dst),
        PieceKind::Queen => {
            (between::is_bishop_valid(src, dst) || between::is_rook_valid(src, dst))
                && between::is_clear(b, src, dst)
        }
        PieceKind::King => is_king_possible(pos, src, dst, color),
    }
}

pub fn simulate(pos: &Position, mv: Move, promote: Option<PieceKind>) -> Option<Position> {
    let mut res = *pos;
    moves::make_move_unchecked(&mut res, mv, promote)?;
    Some(res)
}

pub fn try_move(pos: &Position, mv: Move, promote: Option<PieceKind>) -> Option<Position> {
    let color = pos.board.get(mv.src)?.color;
    if !is_theoretically_possible(pos, mv.src, mv.dst, color) {
        return None;
    }
    let res = simulate(pos, mv, promote)?;
    if attack::is_king_in_check(&res.board, color) {
        return None;
    }
    Some(res)
}

pub fn is_valid_move(pos: &Position, src: Coord, dst: Coord, color: Color) -> bool {
    if !is_theoretically_possible(pos, src, dst, color) {
        return false;
    }
    match simulate(pos, Move::new(src, dst), None) {
        Some(res) => !attack::is_king_in_check(&res.board, color),
        None => false,
    }
}
