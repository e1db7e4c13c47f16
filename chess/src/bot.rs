//! Single-ply heuristic opponent
//!
//! Every legal move is made on a copy of the position and scored by a static formula:
//! material captured, small bonuses for central squares, checks and promotions, and a
//! penalty for landing on an attacked square. The best-scoring moves are kept and one of
//! them is picked at random. There is no search beyond the move itself.

use crate::attack;
use crate::board::Position;
use crate::movegen::{self, MoveList};
use crate::moves::{self, Move, MoveKind};
use crate::types::{Color, Coord, PieceKind};

use log::{trace, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Bonus for landing on one of the 16 central squares
pub const CENTER_BONUS: i32 = 1;
/// Bonus for giving check
pub const CHECK_BONUS: i32 = 2;
/// Bonus for promoting a pawn
pub const PROMOTION_BONUS: i32 = 6;

/// Probability that the bot accepts a draw offer, unless configured otherwise
pub const DEFAULT_DRAW_ACCEPT_PROBABILITY: f64 = 0.35;

/// Facts about a move that the score is computed from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveFeatures {
    /// Value of the captured piece, zero if nothing is captured
    pub capture_value: i32,
    /// The opponent's king is attacked after the move
    pub gives_check: bool,
    /// A pawn reaches the last rank
    pub is_promotion: bool,
    /// Destination square
    pub dst: Coord,
    /// The opponent attacks the destination square after the move
    pub dst_attacked: bool,
    /// Value of the moving piece before the move
    pub moving_value: i32,
}

impl MoveFeatures {
    /// Returns `true` if `c` is one of the squares from c3 to f6
    #[inline]
    pub fn is_center(c: Coord) -> bool {
        (2..=5).contains(&c.row()) && (2..=5).contains(&c.col())
    }

    pub fn score(&self) -> i32 {
        let center = if Self::is_center(self.dst) { CENTER_BONUS } else { 0 };
        let check = if self.gives_check { CHECK_BONUS } else { 0 };
        let promotion = if self.is_promotion { PROMOTION_BONUS } else { 0 };
        let penalty = if self.dst_attacked {
            (self.moving_value / 2).max(1)
        } else {
            0
        };
        self.capture_value + center + check + promotion - penalty
    }
}

/// Computes the features of move `mv` made by color `color`
///
/// The move is made on a copy of `pos`, with promotions resolved to a queen. Returns `None`
/// if the source square is empty. Legality is not checked.
pub fn features(pos: &Position, mv: Move, color: Color) -> Option<MoveFeatures> {
    let mut after = *pos;
    let effect = moves::make_move_unchecked(&mut after, mv, Some(PieceKind::Queen))?;
    let enemy = color.inv();
    Some(MoveFeatures {
        capture_value: effect.captured.map_or(0, |p| p.kind.value()),
        gives_check: after
            .board
            .king_pos(enemy)
            .map_or(false, |k| attack::is_square_attacked(&after.board, k, color)),
        is_promotion: effect.kind == MoveKind::Promote,
        dst: mv.dst,
        dst_attacked: attack::is_square_attacked(&after.board, mv.dst, enemy),
        moving_value: effect.piece.kind.value(),
    })
}

/// Scores move `mv` made by color `color`, see [`features`]
#[inline]
pub fn evaluate(pos: &Position, mv: Move, color: Color) -> Option<i32> {
    features(pos, mv, color).map(|f| f.score())
}

/// Returns the best move of color `color`, breaking ties with `rng`
///
/// Returns `None` only if `color` has no legal moves.
pub fn find_best_move<R: Rng + ?Sized>(
    pos: &Position,
    color: Color,
    rng: &mut R,
) -> Option<Move> {
    let mut best = MoveList::new();
    let mut best_score = i32::MIN;
    for mv in &movegen::all_legal_moves(pos, color) {
        let score = match evaluate(pos, *mv, color) {
            Some(s) => s,
            None => continue,
        };
        trace!("candidate {} scores {}", mv, score);
        if score > best_score {
            best_score = score;
            best.clear();
        }
        if score == best_score {
            best.push(*mv);
        }
    }
    best.choose(rng).copied()
}

/// Bot settings
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BotConfig {
    /// Probability of accepting a draw offer, between 0 and 1
    pub draw_accept_probability: f64,
    /// Piece the bot promotes its pawns to
    pub promotion_piece: PieceKind,
}

impl Default for BotConfig {
    fn default() -> BotConfig {
        BotConfig {
            draw_accept_probability: DEFAULT_DRAW_ACCEPT_PROBABILITY,
            promotion_piece: PieceKind::Queen,
        }
    }
}

/// Automated opponent with its own random source
///
/// # Example
///
/// ```
/// # use chesslab::{Bot, Color, Position};
/// #
/// let mut bot = Bot::seeded(42);
/// let mv = bot.find_best_move(&Position::initial(), Color::White);
/// assert!(mv.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Bot<R = Xoshiro256PlusPlus> {
    rng: R,
    config: BotConfig,
}

impl Bot<Xoshiro256PlusPlus> {
    /// Creates a bot with a fixed seed, so its choices can be replayed
    pub fn seeded(seed: u64) -> Self {
        Bot::with_rng(Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Creates a bot seeded from the thread-local generator
    pub fn from_entropy() -> Self {
        Bot::seeded(rand::random())
    }
}

impl<R: Rng> Bot<R> {
    pub fn with_rng(rng: R) -> Self {
        Bot {
            rng,
            config: BotConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Picks a move for color `color`, see [`find_best_move`](self::find_best_move)
    pub fn find_best_move(&mut self, pos: &Position, color: Color) -> Option<Move> {
        find_best_move(pos, color, &mut self.rng)
    }

    /// Decides whether to accept a draw offer
    ///
    /// The answer does not depend on the position.
    pub fn accept_draw(&mut self) -> bool {
        let mut p = self.config.draw_accept_probability;
        if !(0.0..=1.0).contains(&p) {
            warn!("bad draw accept probability {}, using the default", p);
            p = DEFAULT_DRAW_ACCEPT_PROBABILITY;
        }
        self.rng.gen_bool(p)
    }
}
