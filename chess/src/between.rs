use crate::board::Board;
use crate::types::Coord;

#[inline]
pub fn is_bishop_valid(src: Coord, dst: Coord) -> bool {
    src != dst && src.row().abs_diff(dst.row()) == src.col().abs_diff(dst.col())
}

#[inline]
pub fn is_rook_valid(src: Coord, dst: Coord) -> bool {
    (src.row() == dst.row()) != (src.col() == dst.col())
}

// Empty if `src` and `dst` are not aligned
pub fn strict(src: Coord, dst: Coord) -> impl Iterator<Item = Coord> {
    let aligned = is_bishop_valid(src, dst) || is_rook_valid(src, dst);
    let dr = (dst.row() as isize - src.row() as isize).signum();
    let dc = (dst.col() as isize - src.col() as isize).signum();
    let len = src.row().abs_diff(dst.row()).max(src.col().abs_diff(dst.col()));
    let count = if aligned { len.saturating_sub(1) } else { 0 };
    (1..=count as isize).filter_map(move |i| src.try_shift(dr * i, dc * i))
}

#[inline]
pub fn is_clear(b: &Board, src: Coord, dst: Coord) -> bool {
    strict(src, dst).all(|c| b.get(c).is_none())
}
