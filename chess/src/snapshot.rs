//! Game snapshots and their text form
//!
//! A snapshot is written as one line:
//!
//! ```text
//! c0,c1,...,c63|turn=w;wkm=0;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=-;wcap=;bcap=;hist=
//! ```
//!
//! Cells go in display order (row 0 is Black's back rank), each one is `0` for an empty
//! square or a FEN piece letter. The keys `wkm`, `bkm` (king moved), `wra`, `wrh`, `bra`,
//! `brh` (rook on the a- or h-file moved) are `0` or `1`. `ep` is `row:col` or `-`. `wcap`
//! and `bcap` list the captured white and black pieces as FEN letters, in capture order.
//! `hist` lists the move records separated by `,`, with a space between the white and the
//! black half of a record.
//!
//! [`GameSnapshot::from_str`] is strict and reports the first problem it finds. Saved games
//! should be loaded with [`GameSnapshot::from_saved`], which never fails.

use crate::board::{Board, Position};
use crate::types::{Color, Coord, HomePiece, Piece};

use std::fmt::{self, Display};
use std::str::FromStr;

use log::warn;
use thiserror::Error;

/// Error parsing a [`GameSnapshot`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SnapshotParseError {
    /// No `|` between the board and the fields
    #[error("no delimiter between board and fields")]
    NoDelimiter,
    /// Wrong number of cells
    #[error("expected 64 cells, got {0}")]
    BadCellCount(usize),
    /// Bad cell token
    #[error("bad cell {0:?}")]
    BadCell(String),
    /// Field without `=`
    #[error("bad field {0:?}")]
    BadField(String),
    /// Unknown key
    #[error("unknown key {0:?}")]
    UnknownKey(String),
    /// Required key is absent
    #[error("missing key {0:?}")]
    MissingKey(&'static str),
    /// Bad value for a key
    #[error("bad value {value:?} for key {key:?}")]
    BadValue { key: &'static str, value: String },
}

/// Pieces removed from the board, grouped by their color
///
/// This is for display only, it takes no part in the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CapturedPieces {
    /// White pieces captured by Black, in capture order
    pub white: Vec<Piece>,
    /// Black pieces captured by White, in capture order
    pub black: Vec<Piece>,
}

impl CapturedPieces {
    pub fn new() -> CapturedPieces {
        CapturedPieces::default()
    }

    /// Records the captured piece `p` in the list of its color
    pub fn push(&mut self, p: Piece) {
        self.of_mut(p.color).push(p);
    }

    /// Captured pieces of color `c`
    pub fn of(&self, c: Color) -> &[Piece] {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn of_mut(&mut self, c: Color) -> &mut Vec<Piece> {
        match c {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Total value of the captured pieces of color `c`
    pub fn material(&self, c: Color) -> i32 {
        self.of(c).iter().map(|p| p.kind.value()).sum()
    }
}

/// One full move of the game history
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    /// Move number, starting from 1
    pub number: usize,
    /// White's move
    pub white: String,
    /// Black's reply, if it was made
    pub black: Option<String>,
}

impl Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}. {}", self.number, self.white)?;
        if let Some(black) = &self.black {
            write!(f, " {}", black)?;
        }
        Ok(())
    }
}

/// Full copy of the mutable state of a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub position: Position,
    pub captured: CapturedPieces,
    pub history: Vec<MoveRecord>,
}

impl GameSnapshot {
    /// Snapshot of a game that has just started
    pub fn initial() -> GameSnapshot {
        GameSnapshot::from_position(Position::initial())
    }

    /// Snapshot with the given position, no captures and empty history
    pub fn from_position(position: Position) -> GameSnapshot {
        GameSnapshot {
            position,
            captured: CapturedPieces::new(),
            history: Vec::new(),
        }
    }

    /// Loads a saved snapshot, repairing what can be repaired
    ///
    /// Fields that are missing or malformed get their defaults: castling rights are intact,
    /// there is no en passant target, White is to move, nothing is captured and the history
    /// is empty. If the board itself cannot be read, the initial snapshot is returned.
    pub fn from_saved(s: &str) -> GameSnapshot {
        match parse(s, false) {
            Ok(res) => res,
            Err(e) => {
                warn!("cannot read saved board ({}), starting a new game", e);
                GameSnapshot::initial()
            }
        }
    }
}

impl Default for GameSnapshot {
    fn default() -> GameSnapshot {
        GameSnapshot::initial()
    }
}

const RIGHT_KEYS: [(&str, Color, HomePiece); 6] = [
    ("wkm", Color::White, HomePiece::King),
    ("bkm", Color::Black, HomePiece::King),
    ("wra", Color::White, HomePiece::RookA),
    ("wrh", Color::White, HomePiece::RookH),
    ("bra", Color::Black, HomePiece::RookA),
    ("brh", Color::Black, HomePiece::RookH),
];

const REQUIRED_KEYS: [&str; 7] = ["wkm", "bkm", "wra", "wrh", "bra", "brh", "ep"];

fn parse_board(s: &str) -> Result<Board, SnapshotParseError> {
    let cells: Vec<&str> = s.split(',').collect();
    if cells.len() != 64 {
        return Err(SnapshotParseError::BadCellCount(cells.len()));
    }
    let mut board = Board::empty();
    for (coord, token) in Coord::iter().zip(cells) {
        let piece = match token {
            "0" => None,
            _ => Some(
                Piece::from_str(token)
                    .map_err(|_| SnapshotParseError::BadCell(token.to_string()))?,
            ),
        };
        board.set(coord, piece);
    }
    Ok(board)
}

fn parse_ep(value: &str) -> Option<Option<Coord>> {
    if value == "-" {
        return Some(None);
    }
    let (row, col) = value.split_once(':')?;
    let row = row.parse::<usize>().ok()?;
    let col = col.parse::<usize>().ok()?;
    Coord::from_row_col(row, col).map(Some)
}

fn parse_pieces(value: &str) -> Option<Vec<Piece>> {
    value.chars().map(Piece::from_char).collect()
}

fn parse_history(value: &str) -> Option<Vec<MoveRecord>> {
    if value.is_empty() {
        return Some(Vec::new());
    }
    value
        .split(',')
        .enumerate()
        .map(|(idx, rec)| {
            let mut halves = rec.split(' ');
            let white = halves.next().filter(|w| !w.is_empty())?;
            let black = halves.next().map(str::to_string);
            if halves.next().is_some() || black.as_deref() == Some("") {
                return None;
            }
            Some(MoveRecord {
                number: idx + 1,
                white: white.to_string(),
                black,
            })
        })
        .collect()
}

fn apply_field(
    res: &mut GameSnapshot,
    key: &str,
    value: &str,
) -> Result<&'static str, SnapshotParseError> {
    fn bad(key: &'static str, value: &str) -> SnapshotParseError {
        SnapshotParseError::BadValue {
            key,
            value: value.to_string(),
        }
    }

    if let Some(&(k, c, hp)) = RIGHT_KEYS.iter().find(|(k, _, _)| *k == key) {
        match value {
            "0" => {}
            "1" => res.position.castling.mark_moved(c, hp),
            _ => return Err(bad(k, value)),
        }
        return Ok(k);
    }

    match key {
        "turn" => {
            let side = match value {
                "w" => Color::White,
                "b" => Color::Black,
                _ => return Err(bad("turn", value)),
            };
            res.position.side = side;
            Ok("turn")
        }
        "ep" => {
            res.position.ep_target = parse_ep(value).ok_or_else(|| bad("ep", value))?;
            Ok("ep")
        }
        "wcap" => {
            res.captured.white = parse_pieces(value).ok_or_else(|| bad("wcap", value))?;
            Ok("wcap")
        }
        "bcap" => {
            res.captured.black = parse_pieces(value).ok_or_else(|| bad("bcap", value))?;
            Ok("bcap")
        }
        "hist" => {
            res.history = parse_history(value).ok_or_else(|| bad("hist", value))?;
            Ok("hist")
        }
        _ => Err(SnapshotParseError::UnknownKey(key.to_string())),
    }
}

fn parse(s: &str, strict: bool) -> Result<GameSnapshot, SnapshotParseError> {
    let (board, fields) = match s.split_once('|') {
        Some(parts) => parts,
        None if strict => return Err(SnapshotParseError::NoDelimiter),
        None => (s, ""),
    };
    let board = parse_board(board.trim())?;
    let mut res = GameSnapshot::from_position(Position::from_board(board, Color::White));

    let mut seen = Vec::new();
    for field in fields.trim().split(';').filter(|f| !f.is_empty()) {
        let applied = match field.split_once('=') {
            Some((key, value)) => apply_field(&mut res, key, value),
            None => Err(SnapshotParseError::BadField(field.to_string())),
        };
        match applied {
            Ok(key) => seen.push(key),
            Err(e) if strict => return Err(e),
            Err(e) => warn!("ignoring saved field: {}", e),
        }
    }

    if strict {
        if let Some(&key) = REQUIRED_KEYS.iter().find(|&&k| !seen.contains(&k)) {
            return Err(SnapshotParseError::MissingKey(key));
        }
    }
    Ok(res)
}

impl FromStr for GameSnapshot {
    type Err = SnapshotParseError;

    fn from_str(s: &str) -> Result<GameSnapshot, Self::Err> {
        parse(s, true)
    }
}

impl Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let pos = &self.position;
        for (i, coord) in Coord::iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            match pos.board.get(coord) {
                Some(p) => write!(f, "{}", p)?,
                None => write!(f, "0")?,
            }
        }

        write!(f, "|turn={}", pos.side.as_char())?;
        for (key, c, hp) in RIGHT_KEYS {
            write!(f, ";{}={}", key, pos.castling.has_moved(c, hp) as u8)?;
        }
        match pos.ep_target {
            Some(c) => write!(f, ";ep={}:{}", c.row(), c.col())?,
            None => write!(f, ";ep=-")?,
        }

        write!(f, ";wcap=")?;
        for p in &self.captured.white {
            write!(f, "{}", p)?;
        }
        write!(f, ";bcap=")?;
        for p in &self.captured.black {
            write!(f, "{}", p)?;
        }

        write!(f, ";hist=")?;
        for (i, rec) in self.history.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", rec.white)?;
            if let Some(black) = &rec.black {
                write!(f, " {}", black)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CastlingRights, PieceKind};

    const INITIAL_CELLS: &str = "r,n,b,q,k,b,n,r,p,p,p,p,p,p,p,p,\
        0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,\
        P,P,P,P,P,P,P,P,R,N,B,Q,K,B,N,R";

    fn sample() -> GameSnapshot {
        let board =
            Board::from_placement("r3k2r/pp3ppp/8/3pP3/8/8/PPP2PPP/R3K2R").unwrap();
        let mut position = Position::from_board(board, Color::White);
        position.castling = CastlingRights::FRESH
            .with_moved(Color::Black, HomePiece::RookH)
            .with_moved(Color::White, HomePiece::RookA);
        position.ep_target = Coord::from_row_col(2, 3);
        GameSnapshot {
            position,
            captured: CapturedPieces {
                white: vec![
                    Piece::new(Color::White, PieceKind::Pawn),
                    Piece::new(Color::White, PieceKind::Knight),
                ],
                black: vec![Piece::new(Color::Black, PieceKind::Queen)],
            },
            history: vec![
                MoveRecord {
                    number: 1,
                    white: "e2e4".to_string(),
                    black: Some("e7e5".to_string()),
                },
                MoveRecord {
                    number: 2,
                    white: "Ng1f3".to_string(),
                    black: Some("Nb8xc6".to_string()),
                },
                MoveRecord {
                    number: 3,
                    white: "O-O".to_string(),
                    black: None,
                },
            ],
        }
    }

    #[test]
    fn test_initial() {
        let s = GameSnapshot::initial().to_string();
        assert_eq!(
            s,
            format!(
                "{}|turn=w;wkm=0;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=-;wcap=;bcap=;hist=",
                INITIAL_CELLS
            )
        );
        assert_eq!(GameSnapshot::from_str(&s), Ok(GameSnapshot::initial()));
    }

    #[test]
    fn test_round_trip() {
        let snap = sample();
        let s = snap.to_string();
        assert!(s.contains("|turn=w;wkm=0;bkm=0;wra=1;wrh=0;bra=0;brh=1;ep=2:3;"));
        assert!(s.ends_with(";wcap=PN;bcap=q;hist=e2e4 e7e5,Ng1f3 Nb8xc6,O-O"));
        assert_eq!(GameSnapshot::from_str(&s), Ok(snap.clone()));
        assert_eq!(GameSnapshot::from_saved(&s), snap);
    }

    #[test]
    fn test_minimal() {
        // Only the keys of the basic format
        let s = format!(
            "{}|wkm=1;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=-",
            INITIAL_CELLS
        );
        let snap = GameSnapshot::from_str(&s).unwrap();
        assert_eq!(snap.position.side, Color::White);
        assert!(snap.position.castling.has_moved(Color::White, HomePiece::King));
        assert!(snap.captured.white.is_empty());
        assert!(snap.history.is_empty());
    }

    #[test]
    fn test_strict_errors() {
        assert_eq!(
            GameSnapshot::from_str(INITIAL_CELLS),
            Err(SnapshotParseError::NoDelimiter)
        );
        assert_eq!(
            GameSnapshot::from_str("0,0,0|ep=-"),
            Err(SnapshotParseError::BadCellCount(3))
        );
        let with = |fields: &str| GameSnapshot::from_str(&format!("{}|{}", INITIAL_CELLS, fields));
        assert_eq!(
            with("wkm=0;bkm=0;wra=0;wrh=0;bra=0;brh=0"),
            Err(SnapshotParseError::MissingKey("ep"))
        );
        assert_eq!(
            with("wkm=2;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=-"),
            Err(SnapshotParseError::BadValue {
                key: "wkm",
                value: "2".to_string()
            })
        );
        assert_eq!(
            with("wkm=0;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=9:1"),
            Err(SnapshotParseError::BadValue {
                key: "ep",
                value: "9:1".to_string()
            })
        );
        assert_eq!(
            with("wkm=0;bkm=0;wra=0;wrh=0;bra=0;brh=0;ep=-;foo=1"),
            Err(SnapshotParseError::UnknownKey("foo".to_string()))
        );
        assert_eq!(
            with("wkm;bkm=0"),
            Err(SnapshotParseError::BadField("wkm".to_string()))
        );
        let bad_cell = INITIAL_CELLS.replacen('r', "x", 1);
        assert_eq!(
            GameSnapshot::from_str(&format!("{}|ep=-", bad_cell)),
            Err(SnapshotParseError::BadCell("x".to_string()))
        );
    }

    #[test]
    fn test_lenient() {
        // Broken fields get their defaults
        let s = format!(
            "{}|turn=x;wkm=yes;bkm=1;ep=12;wcap=?;hist=,",
            INITIAL_CELLS
        );
        let snap = GameSnapshot::from_saved(&s);
        assert_eq!(snap.position.board, Board::initial());
        assert_eq!(snap.position.side, Color::White);
        assert!(!snap.position.castling.has_moved(Color::White, HomePiece::King));
        assert!(snap.position.castling.has_moved(Color::Black, HomePiece::King));
        assert_eq!(snap.position.ep_target, None);
        assert!(snap.captured.white.is_empty());
        assert!(snap.history.is_empty());

        // No fields at all
        let snap = GameSnapshot::from_saved(INITIAL_CELLS);
        assert_eq!(snap, GameSnapshot::initial());

        // Broken board
        assert_eq!(GameSnapshot::from_saved(""), GameSnapshot::initial());
        assert_eq!(
            GameSnapshot::from_saved("garbage|turn=b"),
            GameSnapshot::initial()
        );
    }

    #[test]
    fn test_captured() {
        let mut cap = CapturedPieces::new();
        cap.push(Piece::new(Color::Black, PieceKind::Rook));
        cap.push(Piece::new(Color::White, PieceKind::Pawn));
        cap.push(Piece::new(Color::Black, PieceKind::Knight));
        assert_eq!(cap.of(Color::Black).len(), 2);
        assert_eq!(cap.material(Color::Black), 8);
        assert_eq!(cap.material(Color::White), 1);
    }

    #[test]
    fn test_record_display() {
        let snap = sample();
        assert_eq!(snap.history[0].to_string(), "1. e2e4 e7e5");
        assert_eq!(snap.history[2].to_string(), "3. O-O");
    }
}
