//! Request and response messages shared by the worker and the CLI.

use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{EngineError, Move, SearchLimit, Searcher};
use crate::logic::board::{Board, Player};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    /// `budget` is in milliseconds.
    #[default]
    Time,
    /// `budget` is a search depth.
    Depth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub board: Vec<Vec<i32>>,
    pub side_to_move: i32,
    pub budget: u64,
    #[serde(default)]
    pub budget_kind: BudgetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub best_move: Move,
    pub elapsed_seconds: f64,
    pub nodes_visited: u64,
    pub depth: u8,
}

impl MoveRequest {
    pub fn new(board: &Board, side: Player, limit: SearchLimit) -> Self {
        let (budget, budget_kind) = match limit {
            SearchLimit::Depth(d) => (u64::from(d), BudgetKind::Depth),
            SearchLimit::Time(ms) => (ms, BudgetKind::Time),
        };
        Self {
            board: board.to_grid(),
            side_to_move: side.value(),
            budget,
            budget_kind,
            config: None,
        }
    }

    pub fn side(&self) -> Result<Player, EngineError> {
        Player::from_value(self.side_to_move).ok_or(EngineError::InvalidSide(self.side_to_move))
    }

    pub fn limit(&self) -> Result<SearchLimit, EngineError> {
        if self.budget == 0 {
            return Err(EngineError::ZeroBudget);
        }
        Ok(match self.budget_kind {
            BudgetKind::Time => SearchLimit::Time(self.budget),
            BudgetKind::Depth => SearchLimit::Depth(u8::try_from(self.budget).unwrap_or(u8::MAX)),
        })
    }

    /// Validated board, side and budget. A request config, if any, is
    /// checked too.
    pub fn parse(&self) -> Result<(Board, Player, SearchLimit), EngineError> {
        let board = Board::from_grid(&self.board)?;
        let side = self.side()?;
        let limit = self.limit()?;
        if let Some(config) = &self.config {
            config.validate()?;
        }
        if board.is_full() {
            return Err(EngineError::BoardFull);
        }
        Ok((board, side, limit))
    }
}

/// Validates `request` and runs the search. A request config applies to
/// this request only; `engine` keeps its own config.
pub fn handle_request(
    engine: &mut AlphaBetaEngine,
    request: &MoveRequest,
) -> Result<MoveResponse, EngineError> {
    let start = AlphaBetaEngine::now();

    let (board, side, limit) = request.parse().inspect_err(|e| {
        log::warn!("rejected request: {e}");
    })?;

    log::debug!(
        "{}x{} board, {} stones, {:?} to move, {limit:?}",
        board.rows(),
        board.cols(),
        board.stone_count(),
        side
    );

    let (best_move, stats) = match &request.config {
        Some(config) => AlphaBetaEngine::new(Arc::new(config.clone())).search(&board, side, limit)?,
        None => engine.search(&board, side, limit)?,
    };

    Ok(MoveResponse {
        best_move,
        elapsed_seconds: (AlphaBetaEngine::now() - start).max(0.0) / 1000.0,
        nodes_visited: stats.nodes,
        depth: stats.depth,
    })
}
