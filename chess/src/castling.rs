use crate::attack;
use crate::between;
use crate::board::Position;
use crate::types::{CastlingSide, Color, Coord, File, HomePiece, Piece, PieceKind};

use chesslab_base::geometry;

#[inline]
pub fn home_square(c: Color, piece: HomePiece) -> Coord {
    Coord::from_parts(piece.home_file(), geometry::castling_rank(c))
}

/// Squares the king crosses or lands on while castling to `side`
pub fn king_path(c: Color, side: CastlingSide) -> [Coord; 2] {
    let rank = geometry::castling_rank(c);
    let files = match side {
        CastlingSide::King => [File::F, File::G],
        CastlingSide::Queen => [File::D, File::C],
    };
    files.map(|file| Coord::from_parts(file, rank))
}

pub fn can_castle(pos: &Position, c: Color, side: CastlingSide) -> bool {
    if !pos.castling.allows(c, side) {
        return false;
    }

    let b = &pos.board;
    let king = home_square(c, HomePiece::King);
    let rook = home_square(c, side.rook());
    if b.get(king) != Some(Piece::new(c, PieceKind::King))
        || b.get(rook) != Some(Piece::new(c, PieceKind::Rook))
    {
        return false;
    }
    if !between::is_clear(b, king, rook) {
        return false;
    }

    let enemy = c.inv();
    if attack::is_square_attacked(b, king, enemy) {
        return false;
    }
    king_path(c, side)
        .iter()
        .all(|&sq| !attack::is_square_attacked(b, sq, enemy))
}
