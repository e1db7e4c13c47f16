//! Game session
//!
//! [`Game`] owns the live state of one game: the position, captured pieces, move history
//! and the undo stack. Moves go in through [`Game::play()`] (or [`Game::push_snapshot()`]
//! followed by [`Game::apply_move()`]), and every completed move is followed by outcome
//! detection against the side to move next.
//!
//! A pawn reaching the last rank without a promotion choice puts the game into
//! [`GameState::AwaitingPromotionChoice`]. No other move is accepted until
//! [`Game::resolve_promotion()`] is called.

use crate::board::Position;
use crate::bot::Bot;
use crate::moves::{self, Move, MoveKind};
use crate::persist::{GameRecord, HistorySink, SaveSlot};
use crate::snapshot::{CapturedPieces, GameSnapshot, MoveRecord};
use crate::types::{Color, Coord, Finish, GameResult, MoveOutcome, PieceKind};
use crate::{legal, movegen};

use log::{debug, warn};
use rand::Rng;
use thiserror::Error;

/// Notation placed in the white half of a record when Black moves first
pub const MISSING_WHITE_MOVE: &str = "...";

/// Error for a refused game command
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Move is not legal in the current position
    #[error("illegal move {0}")]
    Illegal(Move),
    /// A pawn waits for a promotion choice
    #[error("promotion pending on {0}")]
    PromotionPending(Coord),
    /// No pawn waits for a promotion choice
    #[error("no promotion pending")]
    NoPromotionPending,
    /// The game is over
    #[error("game is over")]
    GameOver,
    /// Piece kind is not a valid promotion target
    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
    /// Only the bot answers draw offers
    #[error("no bot opponent to offer a draw to")]
    NoBotOpponent,
}

/// Who plays the game
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Two humans at the same board
    #[default]
    Friend,
    /// A human against the bot playing `bot_color`
    Bot { bot_color: Color },
}

impl GameMode {
    /// Color of the human player whose results are recorded
    ///
    /// In a game between two humans, this is White.
    pub fn player_color(&self) -> Color {
        match *self {
            GameMode::Friend => Color::White,
            GameMode::Bot { bot_color } => bot_color.inv(),
        }
    }

    /// Returns `true` if color `c` is played by the bot
    pub fn is_bot(&self, c: Color) -> bool {
        matches!(*self, GameMode::Bot { bot_color } if bot_color == c)
    }
}

/// State of a game session
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    /// The side to move may move
    Playing,
    /// A pawn on `square` waits for a promotion choice
    AwaitingPromotionChoice { square: Coord },
    /// The game is over
    Finished(Finish),
}

/// One game session
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    captured: CapturedPieces,
    history: Vec<MoveRecord>,
    state: GameState,
    undo: Vec<GameSnapshot>,
    mode: GameMode,
}

impl Game {
    /// Starts a new game from the initial position
    pub fn new(mode: GameMode) -> Game {
        Game::from_snapshot(mode, GameSnapshot::initial())
    }

    /// Starts a game from the given snapshot, with an empty undo stack
    pub fn from_snapshot(mode: GameMode, snapshot: GameSnapshot) -> Game {
        let mut res = Game {
            position: snapshot.position,
            captured: CapturedPieces::new(),
            history: Vec::new(),
            state: GameState::Playing,
            undo: Vec::new(),
            mode,
        };
        res.restore(snapshot);
        res
    }

    /// Resets the game to the initial position and clears the undo stack
    pub fn new_game(&mut self) {
        debug!("new game, mode {:?}", self.mode);
        self.restore(GameSnapshot::initial());
        self.undo.clear();
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.position.side
    }

    #[inline]
    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, GameState::Finished(_))
    }

    /// Number of moves that can be undone
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Returns `true` if the side to move may legally go from `src` to `dst`
    pub fn is_valid_move(&self, src: Coord, dst: Coord) -> bool {
        self.state == GameState::Playing
            && legal::is_valid_move(&self.position, src, dst, self.position.side)
    }

    /// Legal destinations of the piece on `src`
    ///
    /// The list is empty unless `src` holds a piece of the side to move and the game
    /// accepts moves.
    pub fn destinations(&self, src: Coord) -> Vec<Coord> {
        let own = self
            .position
            .board
            .get(src)
            .map_or(false, |p| p.color == self.position.side);
        if self.state != GameState::Playing || !own {
            return Vec::new();
        }
        movegen::destinations(&self.position, src)
    }

    /// Full copy of the current state
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            position: self.position,
            captured: self.captured.clone(),
            history: self.history.clone(),
        }
    }

    /// Saves the current state on the undo stack
    ///
    /// Must be called before the move it should undo is applied.
    pub fn push_snapshot(&mut self) {
        let snap = self.snapshot();
        self.undo.push(snap);
    }

    /// Replaces the whole state with `snapshot`
    ///
    /// The game state is derived from the position: a pawn of the side to move on its last
    /// rank means a pending promotion, and a position without legal moves is finished. The
    /// undo stack is left as is.
    pub fn restore(&mut self, snapshot: GameSnapshot) {
        self.position = snapshot.position;
        self.captured = snapshot.captured;
        self.history = snapshot.history;
        for c in [Color::White, Color::Black] {
            if self.position.board.king_pos(c).is_none() {
                warn!("no {:?} king on the board, it is treated as always in check", c);
            }
        }
        self.state = match self.position.pending_promotion() {
            Some(square) => GameState::AwaitingPromotionChoice { square },
            None => Self::state_after(self.position.calc_outcome()),
        };
    }

    /// Reverts the last move whose snapshot was pushed
    ///
    /// Returns `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<()> {
        let snap = self.undo.pop()?;
        self.restore(snap);
        debug!("undo, {} more available", self.undo.len());
        Some(())
    }

    fn state_after(outcome: MoveOutcome) -> GameState {
        match outcome {
            MoveOutcome::Checkmate(winner) => GameState::Finished(Finish::Checkmate { winner }),
            MoveOutcome::Stalemate => GameState::Finished(Finish::Stalemate),
            MoveOutcome::AwaitingPromotion(square) => {
                GameState::AwaitingPromotionChoice { square }
            }
            MoveOutcome::Continue | MoveOutcome::Check => GameState::Playing,
        }
    }

    fn check_accepts_moves(&self) -> Result<(), MoveError> {
        match self.state {
            GameState::Playing => Ok(()),
            GameState::AwaitingPromotionChoice { square } => {
                Err(MoveError::PromotionPending(square))
            }
            GameState::Finished(_) => Err(MoveError::GameOver),
        }
    }

    fn check_move(
        &self,
        src: Coord,
        dst: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<(), MoveError> {
        self.check_accepts_moves()?;
        if let Some(kind) = promotion {
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotion(kind));
            }
        }
        if !legal::is_valid_move(&self.position, src, dst, self.position.side) {
            return Err(MoveError::Illegal(Move::new(src, dst)));
        }
        Ok(())
    }

    fn record_history(&mut self, color: Color, notation: String) {
        match color {
            Color::White => self.history.push(MoveRecord {
                number: self.history.len() + 1,
                white: notation,
                black: None,
            }),
            Color::Black => match self.history.last_mut() {
                Some(rec) if rec.black.is_none() => rec.black = Some(notation),
                _ => self.history.push(MoveRecord {
                    number: self.history.len() + 1,
                    white: MISSING_WHITE_MOVE.to_string(),
                    black: Some(notation),
                }),
            },
        }
    }

    /// Applies the move from `src` to `dst` for the side to move
    ///
    /// Does not push a snapshot, use [`Game::play()`] for that. If the move promotes a pawn
    /// and `promotion` is `None`, the pawn is promoted to a queen when the bot makes the move;
    /// otherwise the game waits for [`Game::resolve_promotion()`] and
    /// [`MoveOutcome::AwaitingPromotion`] is returned.
    pub fn apply_move(
        &mut self,
        src: Coord,
        dst: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        self.check_move(src, dst, promotion)?;
        self.apply_checked(src, dst, promotion)
    }

    fn apply_checked(
        &mut self,
        src: Coord,
        dst: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        let color = self.position.side;
        let promotion = match promotion {
            None if self.mode.is_bot(color) => Some(PieceKind::Queen),
            p => p,
        };

        let mv = Move::new(src, dst);
        let effect = moves::make_move_unchecked(&mut self.position, mv, promotion)
            .ok_or(MoveError::Illegal(mv))?;
        if let Some(p) = effect.captured {
            self.captured.push(p);
        }
        let notation = moves::notation(mv, &effect);
        debug!("{:?} plays {}", color, notation);
        self.record_history(color, notation);

        if let Some(square) = effect.pending_promotion {
            self.state = GameState::AwaitingPromotionChoice { square };
            return Ok(MoveOutcome::AwaitingPromotion(square));
        }
        Ok(self.finish_turn())
    }

    /// Promotes the pending pawn to `kind` and passes the turn
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome, MoveError> {
        let square = match self.state {
            GameState::AwaitingPromotionChoice { square } => square,
            _ => return Err(MoveError::NoPromotionPending),
        };
        if !self.position.promote(square, kind) {
            return Err(MoveError::InvalidPromotion(kind));
        }
        debug!("pawn on {} promoted to {:?}", square, kind);
        Ok(self.finish_turn())
    }

    fn finish_turn(&mut self) -> MoveOutcome {
        let outcome = self.position.calc_outcome();
        self.state = Self::state_after(outcome);
        debug!("{}", outcome);
        outcome
    }

    /// Validates the move, pushes a snapshot and applies the move
    pub fn play(
        &mut self,
        src: Coord,
        dst: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        self.check_move(src, dst, promotion)?;
        self.push_snapshot();
        self.apply_checked(src, dst, promotion)
    }

    /// Suggests a move for the side to move, without changing anything
    pub fn hint<R: Rng>(&self, bot: &mut Bot<R>) -> Option<Move> {
        if self.state != GameState::Playing {
            return None;
        }
        bot.find_best_move(&self.position, self.position.side)
    }

    /// Lets `bot` choose a move for the side to move and plays it
    ///
    /// Promotions are resolved to the bot's configured piece, or to a queen if that piece is
    /// not a promotion target. Returns `Ok(None)` if there is no move to make.
    pub fn play_bot_move<R: Rng>(
        &mut self,
        bot: &mut Bot<R>,
    ) -> Result<Option<(Move, MoveOutcome)>, MoveError> {
        self.check_accepts_moves()?;
        let mv = match bot.find_best_move(&self.position, self.position.side) {
            Some(mv) => mv,
            None => return Ok(None),
        };
        let promotes = self
            .position
            .board
            .get(mv.src)
            .map_or(false, |p| moves::classify(&self.position, mv, p) == MoveKind::Promote);
        let promotion = if promotes {
            let mut kind = bot.config().promotion_piece;
            if !kind.is_promotion_target() {
                warn!("bad bot promotion piece {:?}, using a queen", kind);
                kind = PieceKind::Queen;
            }
            Some(kind)
        } else {
            None
        };
        let outcome = self.play(mv.src, mv.dst, promotion)?;
        Ok(Some((mv, outcome)))
    }

    /// Offers a draw to `bot`
    ///
    /// Returns whether the offer was accepted. An accepted draw finishes the game. Offers are
    /// refused in games between two humans and while a promotion choice is pending.
    pub fn offer_draw<R: Rng>(&mut self, bot: &mut Bot<R>) -> Result<bool, MoveError> {
        self.check_accepts_moves()?;
        if !matches!(self.mode, GameMode::Bot { .. }) {
            return Err(MoveError::NoBotOpponent);
        }
        let accepted = bot.accept_draw();
        debug!("draw offer {}", if accepted { "accepted" } else { "declined" });
        if accepted {
            self.state = GameState::Finished(Finish::DrawAgreed);
        }
        Ok(accepted)
    }

    /// Result for color `c`, or `None` if the game is not over
    pub fn result_for(&self, c: Color) -> Option<GameResult> {
        match self.state {
            GameState::Finished(finish) => Some(finish.result_for(c)),
            _ => None,
        }
    }

    /// Stores the current state into the save slot of `player`
    pub fn save<S: SaveSlot + ?Sized>(&self, slot: &mut S, player: &str) {
        slot.save(player, &self.snapshot().to_string());
    }

    /// Restores the game saved by `player`
    ///
    /// Malformed saves are repaired as described in [`GameSnapshot::from_saved()`]. Returns
    /// `false` and changes nothing if there is no save. The undo stack is cleared on load.
    pub fn load<S: SaveSlot + ?Sized>(&mut self, slot: &S, player: &str) -> bool {
        let saved = match slot.load(player) {
            Some(s) => s,
            None => return false,
        };
        self.restore(GameSnapshot::from_saved(&saved));
        self.undo.clear();
        debug!("loaded game of {}", player);
        true
    }

    /// Reports a finished game to the collaborators
    ///
    /// Deletes the save of `player` and records the result from the point of view of the
    /// player's color (see [`GameMode::player_color()`]). Returns the record, or `None` if
    /// the game is not over.
    pub fn report_finish<S: SaveSlot + HistorySink + ?Sized>(
        &self,
        store: &mut S,
        player: &str,
        opponent: &str,
    ) -> Option<GameRecord> {
        let result = self.result_for(self.mode.player_color())?;
        let record = GameRecord::new(player, opponent, result);
        store.delete(player);
        store.record(record.clone());
        debug!("game finished: {}", record);
        Some(record)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(GameMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::persist::MemoryStore;
    use crate::types::{CastlingRights, HomePiece, Piece};
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn game(placement: &str, side: Color, mode: GameMode) -> Game {
        let board = Board::from_placement(placement).unwrap();
        Game::from_snapshot(
            mode,
            GameSnapshot::from_position(Position::from_board(board, side)),
        )
    }

    fn play(g: &mut Game, s: &str) -> MoveOutcome {
        let mv = Move::from_str(s).unwrap();
        g.play(mv.src, mv.dst, None).unwrap()
    }

    #[test]
    fn test_castling_scenario() {
        let mut g = game("4k3/8/8/8/8/8/8/4K2R", Color::White, GameMode::Friend);
        assert!(crate::castling::can_castle(
            g.position(),
            Color::White,
            crate::types::CastlingSide::King
        ));
        assert_eq!(play(&mut g, "e1g1"), MoveOutcome::Continue);
        let b = &g.position().board;
        assert_eq!(b.get(coord("h1")), None);
        assert_eq!(
            b.get(coord("f1")),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(
            b.get(coord("g1")),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert!(g.position().castling.has_moved(Color::White, HomePiece::King));
        assert_eq!(g.history()[0].white, "O-O");
    }

    #[test]
    fn test_enpassant_scenario() {
        let mut g = game("4k3/8/8/8/3p4/8/4P3/4K3", Color::White, GameMode::Friend);
        play(&mut g, "e2e4");
        assert_eq!(g.position().ep_target, Some(coord("e3")));
        assert!(g.is_valid_move(coord("d4"), coord("e3")));
        play(&mut g, "d4e3");
        let b = &g.position().board;
        assert_eq!(b.get(coord("e4")), None);
        assert_eq!(
            b.get(coord("e3")),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(
            g.captured().white,
            vec![Piece::new(Color::White, PieceKind::Pawn)]
        );
        assert_eq!(g.history()[0].black.as_deref(), Some("d4xe3"));
    }

    #[test]
    fn test_enpassant_expires() {
        let mut g = game("4k3/8/8/8/3p4/8/4P3/4K3", Color::White, GameMode::Friend);
        play(&mut g, "e2e4");
        play(&mut g, "e8d8");
        play(&mut g, "e1d1");
        assert_eq!(g.position().ep_target, None);
        assert!(!g.is_valid_move(coord("d4"), coord("e3")));
        assert_eq!(
            g.play(coord("d4"), coord("e3"), None),
            Err(MoveError::Illegal(Move::new(coord("d4"), coord("e3"))))
        );
    }

    #[test]
    fn test_stalemate_scenario() {
        let mut g = game("7K/8/5n2/8/8/4n3/7k/8", Color::Black, GameMode::Friend);
        assert_eq!(play(&mut g, "e3f5"), MoveOutcome::Stalemate);
        assert_eq!(g.state(), GameState::Finished(Finish::Stalemate));
        assert_eq!(g.result_for(Color::White), Some(GameResult::Draw));
        assert_eq!(
            g.play(coord("h8"), coord("g8"), None),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_checkmate() {
        let mut g = Game::new(GameMode::Friend);
        play(&mut g, "f2f3");
        play(&mut g, "e7e5");
        play(&mut g, "g2g4");
        assert_eq!(play(&mut g, "d8h4"), MoveOutcome::Checkmate(Color::Black));
        assert_eq!(
            g.state(),
            GameState::Finished(Finish::Checkmate {
                winner: Color::Black
            })
        );
        assert_eq!(g.result_for(Color::White), Some(GameResult::Loss));
        assert_eq!(g.history().len(), 2);
        assert_eq!(g.history()[1].to_string(), "2. g2g4 Qd8h4");
    }

    #[test]
    fn test_undo_scenario() {
        let mut g = Game::new(GameMode::Friend);
        let before = g.snapshot();
        play(&mut g, "b2b4");
        assert_eq!(g.position().ep_target, Some(coord("b3")));
        assert_eq!(g.undo(), Some(()));
        assert_eq!(g.snapshot(), before);
        assert_eq!(g.position().side, Color::White);
        assert_eq!(g.position().castling, CastlingRights::FRESH);
        assert_eq!(g.undo(), None);
    }

    #[test]
    fn test_undo_stack() {
        let mut g = Game::new(GameMode::Friend);
        play(&mut g, "e2e4");
        let mid = g.snapshot();
        play(&mut g, "e7e5");
        play(&mut g, "g1f3");
        assert_eq!(g.undo_depth(), 3);
        g.undo().unwrap();
        g.undo().unwrap();
        assert_eq!(g.snapshot(), mid);
        g.new_game();
        assert_eq!(g.undo_depth(), 0);
        assert_eq!(g.snapshot(), GameSnapshot::initial());
    }

    #[test]
    fn test_illegal_move_pushes_nothing() {
        let mut g = Game::new(GameMode::Friend);
        assert!(g.play(coord("e2"), coord("e5"), None).is_err());
        assert!(g.play(coord("e7"), coord("e5"), None).is_err());
        assert_eq!(g.undo_depth(), 0);
        assert_eq!(g.snapshot(), GameSnapshot::initial());
    }

    #[test]
    fn test_promotion_choice() {
        let mut g = game("4k3/P7/8/8/8/8/8/4K3", Color::White, GameMode::Friend);
        assert_eq!(play(&mut g, "a7a8"), MoveOutcome::AwaitingPromotion(coord("a8")));
        assert_eq!(
            g.state(),
            GameState::AwaitingPromotionChoice {
                square: coord("a8")
            }
        );
        assert_eq!(g.side(), Color::White);
        assert_eq!(
            g.play(coord("e1"), coord("e2"), None),
            Err(MoveError::PromotionPending(coord("a8")))
        );
        assert!(g.destinations(coord("e1")).is_empty());
        assert_eq!(
            g.resolve_promotion(PieceKind::King),
            Err(MoveError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(g.resolve_promotion(PieceKind::Rook), Ok(MoveOutcome::Check));
        assert_eq!(g.side(), Color::Black);
        assert_eq!(
            g.position().board.get(coord("a8")),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(
            g.resolve_promotion(PieceKind::Queen),
            Err(MoveError::NoPromotionPending)
        );
        assert_eq!(g.history()[0].white, "a7a8");
    }

    #[test]
    fn test_promotion_undo_and_restore() {
        let mut g = game("4k3/P7/8/8/8/8/8/4K3", Color::White, GameMode::Friend);
        play(&mut g, "a7a8");
        let pending = g.snapshot();
        g.undo().unwrap();
        assert_eq!(g.state(), GameState::Playing);
        g.restore(pending);
        assert_eq!(
            g.state(),
            GameState::AwaitingPromotionChoice {
                square: coord("a8")
            }
        );
    }

    #[test]
    fn test_explicit_promotion() {
        let mut g = game("4k3/P7/8/8/8/8/8/4K3", Color::White, GameMode::Friend);
        assert_eq!(
            g.play(coord("a7"), coord("a8"), Some(PieceKind::Pawn)),
            Err(MoveError::InvalidPromotion(PieceKind::Pawn))
        );
        assert_eq!(
            g.play(coord("a7"), coord("a8"), Some(PieceKind::Knight)),
            Ok(MoveOutcome::Continue)
        );
        assert_eq!(g.state(), GameState::Playing);
    }

    #[test]
    fn test_bot_auto_promotes() {
        let mode = GameMode::Bot {
            bot_color: Color::White,
        };
        let mut g = game("4k3/P7/8/8/8/8/8/4K3", Color::White, mode);
        assert_eq!(
            g.play(coord("a7"), coord("a8"), None),
            Ok(MoveOutcome::Check)
        );
        assert_eq!(
            g.position().board.get(coord("a8")),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn test_bot_game() {
        let mode = GameMode::Bot {
            bot_color: Color::Black,
        };
        let mut g = Game::new(mode);
        let mut bot = Bot::seeded(11);
        play(&mut g, "e2e4");
        let (mv, _) = g.play_bot_move(&mut bot).unwrap().unwrap();
        assert_eq!(g.side(), Color::White);
        let reply = g.history()[0].black.clone().unwrap();
        assert!(reply.ends_with(&mv.dst.to_string()), "{}", reply);
        assert_eq!(g.undo_depth(), 2);

        let hint = g.hint(&mut bot).unwrap();
        assert!(g.is_valid_move(hint.src, hint.dst));
        assert_eq!(g.undo_depth(), 2);
    }

    #[test]
    fn test_bot_takes_queen() {
        let mode = GameMode::Bot {
            bot_color: Color::White,
        };
        let mut g = game("4k3/8/8/3q4/8/8/8/3RK3", Color::White, mode);
        let mut bot = Bot::seeded(11);
        let (mv, outcome) = g.play_bot_move(&mut bot).unwrap().unwrap();
        assert_eq!(mv.to_string(), "d1d5");
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(g.history()[0].white, "Rd1xd5");
        assert_eq!(
            g.captured().black,
            vec![Piece::new(Color::Black, PieceKind::Queen)]
        );
    }

    #[test]
    fn test_destinations() {
        let g = Game::new(GameMode::Friend);
        let mut d: Vec<String> = g
            .destinations(coord("g1"))
            .iter()
            .map(|c| c.to_string())
            .collect();
        d.sort();
        assert_eq!(d, vec!["f3", "h3"]);
        assert!(g.destinations(coord("g8")).is_empty());
    }

    #[test]
    fn test_draw_offer() {
        let mut g = Game::new(GameMode::Bot {
            bot_color: Color::Black,
        });
        let mut bot = Bot::seeded(1).with_config(crate::bot::BotConfig {
            draw_accept_probability: 0.0,
            ..Default::default()
        });
        assert_eq!(g.offer_draw(&mut bot), Ok(false));
        assert_eq!(g.state(), GameState::Playing);

        let mut bot = Bot::seeded(1).with_config(crate::bot::BotConfig {
            draw_accept_probability: 1.0,
            ..Default::default()
        });
        assert_eq!(g.offer_draw(&mut bot), Ok(true));
        assert_eq!(g.state(), GameState::Finished(Finish::DrawAgreed));
        assert_eq!(g.result_for(Color::White), Some(GameResult::Draw));
        assert_eq!(g.offer_draw(&mut bot), Err(MoveError::GameOver));
        assert_eq!(g.hint(&mut bot), None);
    }

    #[test]
    fn test_draw_offer_needs_bot() {
        let mut g = Game::new(GameMode::Friend);
        let mut bot = Bot::seeded(1).with_config(crate::bot::BotConfig {
            draw_accept_probability: 1.0,
            ..Default::default()
        });
        assert_eq!(g.offer_draw(&mut bot), Err(MoveError::NoBotOpponent));
        assert_eq!(g.state(), GameState::Playing);
    }

    #[test]
    fn test_draw_offer_with_pending_promotion() {
        let mode = GameMode::Bot {
            bot_color: Color::Black,
        };
        let mut g = game("4k3/P7/8/8/8/8/8/4K3", Color::White, mode);
        let mut bot = Bot::seeded(1).with_config(crate::bot::BotConfig {
            draw_accept_probability: 1.0,
            ..Default::default()
        });
        assert_eq!(
            play(&mut g, "a7a8"),
            MoveOutcome::AwaitingPromotion(coord("a8"))
        );
        assert_eq!(
            g.offer_draw(&mut bot),
            Err(MoveError::PromotionPending(coord("a8")))
        );
        assert_eq!(
            g.state(),
            GameState::AwaitingPromotionChoice {
                square: coord("a8")
            }
        );
        assert_eq!(
            g.position().board.get(coord("a8")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn test_bot_bad_promotion_piece() {
        let mode = GameMode::Bot {
            bot_color: Color::White,
        };
        let config = crate::bot::BotConfig {
            promotion_piece: PieceKind::King,
            ..Default::default()
        };

        let mut g = Game::new(mode);
        let mut bot = Bot::seeded(1).with_config(config);
        assert!(g.play_bot_move(&mut bot).unwrap().is_some());
        assert_eq!(g.side(), Color::Black);

        let mut g = game("k7/4P3/8/8/8/8/8/4K3", Color::White, mode);
        let (mv, outcome) = g.play_bot_move(&mut bot).unwrap().unwrap();
        assert_eq!(mv, Move::from_str("e7e8").unwrap());
        assert_eq!(outcome, MoveOutcome::Check);
        assert_eq!(
            g.position().board.get(coord("e8")),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn test_rook_captured_at_home_blocks_castling() {
        let mut g = game("4k3/8/8/8/8/7R/6b1/4K2R", Color::Black, GameMode::Friend);
        play(&mut g, "g2h1");
        play(&mut g, "h3h1");
        play(&mut g, "e8d8");
        assert_eq!(
            g.position().board.get(coord("h1")),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert!(!crate::castling::can_castle(
            g.position(),
            Color::White,
            crate::types::CastlingSide::King
        ));
        assert_eq!(
            g.play(coord("e1"), coord("g1"), None),
            Err(MoveError::Illegal(Move::from_str("e1g1").unwrap()))
        );
        assert_eq!(g.undo_depth(), 3);
    }

    #[test]
    fn test_apply_move_validates() {
        let mut g = Game::new(GameMode::Friend);
        let before = g.snapshot();
        assert_eq!(
            g.apply_move(coord("e2"), coord("e5"), None),
            Err(MoveError::Illegal(Move::from_str("e2e5").unwrap()))
        );
        assert_eq!(g.snapshot(), before);
        assert_eq!(
            g.apply_move(coord("e2"), coord("e4"), None),
            Ok(MoveOutcome::Continue)
        );
        assert_eq!(g.undo_depth(), 0);
    }

    #[test]
    fn test_load_without_king() {
        let mut store = MemoryStore::new();
        let snap = GameSnapshot::from_position(Position::from_board(
            Board::from_placement("4k3/8/8/8/8/8/4P3/8").unwrap(),
            Color::White,
        ));
        store.save("alice", &snap.to_string());
        let mut g = Game::new(GameMode::Friend);
        assert!(g.load(&store, "alice"));
        assert_eq!(
            g.state(),
            GameState::Finished(Finish::Checkmate {
                winner: Color::Black
            })
        );
        assert!(!g.is_valid_move(coord("e2"), coord("e4")));
    }

    #[test]
    fn test_black_moves_first() {
        let mut g = game("4k3/8/8/8/8/8/8/4K3", Color::Black, GameMode::Friend);
        play(&mut g, "e8d8");
        play(&mut g, "e1d1");
        assert_eq!(g.history()[0].to_string(), "1. ... Ke8d8");
        assert_eq!(g.history()[1].to_string(), "2. Ke1d1");
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        let mut g = Game::new(GameMode::Friend);
        assert!(!g.load(&store, "alice"));
        play(&mut g, "e2e4");
        play(&mut g, "d7d5");
        play(&mut g, "e4d5");
        g.save(&mut store, "alice");

        let mut other = Game::new(GameMode::Friend);
        assert!(other.load(&store, "alice"));
        assert_eq!(other.snapshot(), g.snapshot());
        assert_eq!(other.undo_depth(), 0);
        assert_eq!(
            other.captured().black,
            vec![Piece::new(Color::Black, PieceKind::Pawn)]
        );

        store.save("bob", "nonsense");
        assert!(other.load(&store, "bob"));
        assert_eq!(other.snapshot(), GameSnapshot::initial());
    }

    #[test]
    fn test_report_finish() {
        let mut store = MemoryStore::new();
        let mut g = Game::new(GameMode::Bot {
            bot_color: Color::White,
        });
        g.save(&mut store, "alice");
        assert_eq!(g.report_finish(&mut store, "alice", "Bot"), None);
        assert!(store.load("alice").is_some());

        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut g, mv);
        }
        let rec = g.report_finish(&mut store, "alice", "Bot").unwrap();
        assert_eq!(rec.result, GameResult::Win);
        assert_eq!(store.load("alice"), None);
        assert_eq!(store.history(), &[rec]);
    }
}
