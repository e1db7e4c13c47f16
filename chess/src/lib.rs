//! Chess rules engine with a simple heuristic opponent
//!
//! The crate keeps an 8×8 board, checks moves against the full rules (castling, en passant
//! and promotion included), detects check, checkmate and stalemate, writes the move history
//! and supports undo through state snapshots. A single-ply [`Bot`] plays against a human and
//! gives hints.
//!
//! Most users only need [`Game`]:
//!
//! ```
//! use chesslab::{Coord, Game, GameMode, MoveOutcome};
//! use std::str::FromStr;
//!
//! let mut game = Game::new(GameMode::Friend);
//! let e2 = Coord::from_str("e2").unwrap();
//! let e4 = Coord::from_str("e4").unwrap();
//! assert_eq!(game.play(e2, e4, None), Ok(MoveOutcome::Continue));
//! assert_eq!(game.history()[0].white, "e2e4");
//!
//! game.undo().unwrap();
//! assert!(game.history().is_empty());
//! ```
//!
//! The lower-level functions in [`legal`], [`movegen`] and [`attack`] work on a
//! [`Position`] and never modify it.

pub mod attack;
pub mod between;
pub mod board;
pub mod bot;
pub mod castling;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod persist;
pub mod snapshot;
pub mod types;

pub use board::{Board, CellsParseError, Position};
pub use bot::{Bot, BotConfig};
pub use game::{Game, GameMode, GameState, MoveError};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind};
pub use persist::{GameRecord, HistorySink, MemoryStore, SaveSlot};
pub use snapshot::{CapturedPieces, GameSnapshot, MoveRecord, SnapshotParseError};
pub use types::{
    CastlingRights, CastlingSide, Color, Coord, File, Finish, GameResult, MoveOutcome, Piece,
    PieceKind, Rank,
};
