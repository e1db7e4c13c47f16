use crate::board::Board;
use crate::types::{Color, Coord, Piece, PieceKind};

use chesslab_base::geometry;

pub(crate) const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const LINE_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn has_piece(b: &Board, c: Option<Coord>, piece: Piece) -> bool {
    c.map_or(false, |c| b.get(c) == Some(piece))
}

fn first_on_ray(b: &Board, coord: Coord, dir: (isize, isize)) -> Option<Piece> {
    let mut cur = coord;
    while let Some(next) = cur.try_shift(dir.0, dir.1) {
        if let Some(p) = b.get(next) {
            return Some(p);
        }
        cur = next;
    }
    None
}

fn is_slider_attack(
    b: &Board,
    coord: Coord,
    color: Color,
    dirs: &[(isize, isize)],
    kind: PieceKind,
) -> bool {
    dirs.iter().any(|&dir| {
        matches!(
            first_on_ray(b, coord, dir),
            Some(p) if p.color == color && (p.kind == kind || p.kind == PieceKind::Queen)
        )
    })
}

/// Returns `true` if any piece of color `color` attacks the square `coord`
pub fn is_square_attacked(b: &Board, coord: Coord, color: Color) -> bool {
    // Trace the attack back from the target: a pawn of `color` attacks forward, so it
    // stands one row behind the attacked square.
    let back = -geometry::pawn_forward(color);
    let pawn = Piece::new(color, PieceKind::Pawn);
    if has_piece(b, coord.try_shift(back, -1), pawn)
        || has_piece(b, coord.try_shift(back, 1), pawn)
    {
        return true;
    }

    let knight = Piece::new(color, PieceKind::Knight);
    if KNIGHT_DELTAS
        .iter()
        .any(|&(dr, dc)| has_piece(b, coord.try_shift(dr, dc), knight))
    {
        return true;
    }

    let king = Piece::new(color, PieceKind::King);
    if KING_DELTAS
        .iter()
        .any(|&(dr, dc)| has_piece(b, coord.try_shift(dr, dc), king))
    {
        return true;
    }

    is_slider_attack(b, coord, color, &DIAG_DIRS, PieceKind::Bishop)
        || is_slider_attack(b, coord, color, &LINE_DIRS, PieceKind::Rook)
}

/// Returns `true` if the king of color `color` is attacked
///
/// A board without such a king is always reported as being in check.
pub fn is_king_in_check(b: &Board, color: Color) -> bool {
    match b.king_pos(color) {
        Some(king) => is_square_attacked(b, king, color.inv()),
        None => true,
    }
}
