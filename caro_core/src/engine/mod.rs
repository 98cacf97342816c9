use crate::engine::config::ConfigError;
use crate::logic::board::{Board, BoardError, Player};
use crate::logic::restriction::Restriction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod eval;
pub mod move_list;
pub mod movegen;
pub mod search;
pub mod tt;
pub mod zobrist;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Move {
    pub row: u8,
    pub col: u8,
    pub score: i32,
}

impl Move {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(row: usize, col: usize, score: i32) -> Self {
        Self {
            row: row as u8,
            col: col as u8,
            score,
        }
    }

    pub const fn row(&self) -> usize {
        self.row as usize
    }

    pub const fn col(&self) -> usize {
        self.col as usize
    }

    pub const fn same_cell(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
}

/// Result of one search call. Interior nodes answer `Scored`, the root
/// answers `BestMove`, and a tripped clock unwinds every frame as `TimedOut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Scored(i32),
    BestMove(Move),
    TimedOut,
}

/// Ordering score of a single candidate; `Win` means the move completes five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEval {
    Score(i32),
    Win,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
    #[error("invalid engine config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("side to move must be 1 or -1, got {0}")]
    InvalidSide(i32),
    #[error("search budget must be positive")]
    ZeroBudget,
    #[error("board has no empty cell")]
    BoardFull,
}

pub trait Evaluator {
    /// Static score of the position from `player`'s point of view.
    fn evaluate(&self, board: &Board, player: Player, restriction: &Restriction) -> i32;

    /// Cheap score of `player` dropping a stone on the empty cell `(row, col)`.
    fn evaluate_move(&self, board: &Board, row: usize, col: usize, player: Player) -> MoveEval;
}

pub trait Searcher {
    fn search(
        &mut self,
        board: &Board,
        player: Player,
        limit: SearchLimit,
    ) -> Result<(Move, SearchStats), EngineError>;
}
