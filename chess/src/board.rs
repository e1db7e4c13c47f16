//! Board, position and related things

use crate::movegen;
use crate::types::{CastlingRights, Color, Coord, File, MoveOutcome, Piece, PieceKind, Rank};

use chesslab_base::geometry;

use std::fmt::{self, Display};
use std::str::FromStr;

use log::warn;
use thiserror::Error;

/// Error parsing piece placement (the first part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// 8×8 grid of optional pieces
///
/// The board is pure storage: it knows nothing about turns, castling or legality. Squares are
/// indexed in display order (see [`Coord`]), so row 0 is Black's back rank.
///
/// # Example
///
/// ```
/// # use chesslab::{Board, Coord, Color, Piece, PieceKind};
/// # use std::str::FromStr;
/// #
/// let mut board = Board::empty();
/// board.set(Coord::from_str("e1").unwrap(), Some(Piece::new(Color::White, PieceKind::King)));
/// board.set(Coord::from_str("d5").unwrap(), Some(Piece::new(Color::Black, PieceKind::King)));
/// assert_eq!(board.placement(), "8/8/8/3k4/8/8/8/4K3");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// Returns an empty board
    pub const fn empty() -> Board {
        Board { cells: [None; 64] }
    }

    /// Returns a board with the standard initial array
    pub fn initial() -> Board {
        let mut res = Board::empty();
        res.place_start_position();
        res
    }

    /// Parses the piece placement part of FEN, like `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`
    #[inline]
    pub fn from_placement(s: &str) -> Result<Board, CellsParseError> {
        Board::from_str(s)
    }

    /// Returns the contents of the square `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `piece` to the square `c`
    #[inline]
    pub fn set(&mut self, c: Coord, piece: Option<Piece>) {
        self.cells[c.index()] = piece;
    }

    /// Puts `piece` to the square with file `file` and rank `rank`
    #[inline]
    pub fn set2(&mut self, file: File, rank: Rank, piece: Option<Piece>) {
        self.set(Coord::from_parts(file, rank), piece);
    }

    /// Removes all the pieces
    pub fn clear(&mut self) {
        self.cells = [None; 64];
    }

    /// Clears the board and lays out the standard initial array
    pub fn place_start_position(&mut self) {
        self.clear();
        for file in File::iter() {
            self.set2(file, Rank::R2, Some(Piece::new(Color::White, PieceKind::Pawn)));
            self.set2(file, Rank::R7, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        }
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            for (file, kind) in File::iter().zip(BACK) {
                self.set2(file, rank, Some(Piece::new(color, kind)));
            }
        }
    }

    /// Iterates over all the occupied squares
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |c| self.get(c).map(|p| (c, p)))
    }

    /// Iterates over the squares occupied by pieces of color `color`
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Returns the position of the king of color `c`, or `None` if there is no such king
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        let king = Piece::new(c, PieceKind::King);
        self.pieces().find(|(_, p)| *p == king).map(|(c, _)| c)
    }

    /// Converts the board into the piece placement part of FEN
    #[inline]
    pub fn placement(&self) -> String {
        self.to_string()
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// ```
    /// # use chesslab::{Board, board::PrettyStyle};
    /// #
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(Board::initial().pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Board together with all the state needed to decide on legal moves
///
/// This is the mutable game state owned by a game session: the board, the side to move,
/// castling rights and the en passant target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    /// Contents of the board
    pub board: Board,
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// Square skipped by the pawn on the immediately preceding double step, if any
    pub ep_target: Option<Coord>,
}

impl Position {
    /// Returns a position with the standard initial array, White to move
    pub fn initial() -> Position {
        Position::from_board(Board::initial(), Color::White)
    }

    /// Returns a position with the given board, fresh castling rights and no en passant
    pub fn from_board(board: Board, side: Color) -> Position {
        Position {
            board,
            side,
            castling: CastlingRights::FRESH,
            ep_target: None,
        }
    }

    /// Returns `true` if the king of color `c` is in check
    #[inline]
    pub fn is_check(&self, c: Color) -> bool {
        crate::attack::is_king_in_check(&self.board, c)
    }

    /// Classifies the position for the side to move
    ///
    /// This function can be computationally expensive, as it calls
    /// [`movegen::has_any_legal_move`].
    pub fn calc_outcome(&self) -> MoveOutcome {
        let side = self.side;
        let check = self.is_check(side);
        let can_move = movegen::has_any_legal_move(self, side);
        match (check, can_move) {
            (true, false) => MoveOutcome::Checkmate(side.inv()),
            (false, false) => MoveOutcome::Stalemate,
            (true, true) => MoveOutcome::Check,
            (false, true) => MoveOutcome::Continue,
        }
    }

    /// Returns the square of a pawn of the side to move that stands on its promotion rank
    ///
    /// Such a pawn exists only while a promotion choice is pending.
    pub fn pending_promotion(&self) -> Option<Coord> {
        let pawn = Piece::new(self.side, PieceKind::Pawn);
        let rank = geometry::promote_rank(self.side);
        File::iter()
            .map(|file| Coord::from_parts(file, rank))
            .find(|&c| self.board.get(c) == Some(pawn))
    }

    /// Replaces the pawn on `square` with a piece of kind `kind` and passes the turn
    ///
    /// Returns `false` and leaves the position intact if there is no pawn of the side to move
    /// on its promotion rank at `square`, or `kind` is not a valid promotion target.
    pub fn promote(&mut self, square: Coord, kind: PieceKind) -> bool {
        let pawn = Piece::new(self.side, PieceKind::Pawn);
        if !kind.is_promotion_target()
            || square.rank() != geometry::promote_rank(self.side)
            || self.board.get(square) != Some(pawn)
        {
            warn!("cannot promote on {} to {:?}", square, kind);
            return false;
        }
        self.board.set(square, Some(Piece::new(self.side, kind)));
        self.side = self.side.inv();
        true
    }
}

impl Default for Position {
    #[inline]
    fn default() -> Position {
        Position::initial()
    }
}

fn parse_cells(s: &str) -> Result<[Option<Piece>; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [None; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] =
                    Some(Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?);
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

impl FromStr for Board {
    type Err = CellsParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(Board {
            cells: parse_cells(s)?,
        })
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = match self.get2(file, rank) {
                    Some(p) => p,
                    None => {
                        empty += 1;
                        continue;
                    }
                };
                if empty != 0 {
                    write!(f, "{}", (b'0' + empty) as char)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn piece(p: Piece) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                let ch = b.get2(file, rank).map_or('.', Self::piece);
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn piece(p: Piece) -> char {
        p.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn piece(p: Piece) -> char {
        p.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}
