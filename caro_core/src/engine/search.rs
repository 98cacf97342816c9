use crate::engine::config::{EngineConfig, SearchAlgorithm};
use crate::engine::eval::PatternEvaluator;
use crate::engine::move_list::MoveList;
use crate::engine::movegen::{HistoryTable, KillerTable, MoveGenerator, MAX_PLY};
use crate::engine::tt::{EvalCache, TTFlag, TranspositionTable};
use crate::engine::zobrist::ZobristKeys;
use crate::engine::{EngineError, Evaluator, Move, SearchLimit, SearchOutcome, SearchStats, Searcher};
use crate::logic::board::{Board, Player};
use crate::logic::eval_constants::{INFINITY, WIN_SCORE};
use crate::logic::restriction::Restriction;
use crate::logic::rules::check_win;
use std::sync::Arc;

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: PatternEvaluator,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: PatternEvaluator::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            0.0 // Fail safe instead of panic
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let start = SystemTime::now();
            let since_the_epoch = start.duration_since(UNIX_EPOCH).unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
                1000.0,
                f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
            );
            time_ms
        }
    }

    fn depth_cap(&self) -> u8 {
        let deepest = u8::try_from(MAX_PLY - 1).unwrap_or(u8::MAX);
        self.config.max_depth.clamp(1, deepest)
    }
}

/// Depths visited by iterative deepening: even depths up to `max_depth`,
/// plus `max_depth` itself when it is odd.
pub fn iteration_depths(max_depth: u8) -> Vec<u8> {
    let mut depths: Vec<u8> = (2..=max_depth).step_by(2).collect();
    if depths.last() != Some(&max_depth) {
        depths.push(max_depth);
    }
    depths
}

/// Everything one request needs while searching. Built per request and
/// dropped with it, so nothing leaks between requests.
pub struct SearchContext<'a> {
    config: &'a EngineConfig,
    evaluator: &'a PatternEvaluator,
    keys: ZobristKeys,
    tt: TranspositionTable,
    eval_cache: EvalCache,
    killers: KillerTable,
    history: HistoryTable,
    nodes: u64,
    start_time: f64,
    time_limit: Option<f64>,
    timed_out: bool,
    max_depth: u8,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        config: &'a EngineConfig,
        evaluator: &'a PatternEvaluator,
        board: &Board,
        time_limit: Option<f64>,
    ) -> Self {
        Self {
            config,
            evaluator,
            keys: ZobristKeys::for_board(board, config.zobrist_seed),
            tt: TranspositionTable::new(config.tt_size_mb),
            eval_cache: EvalCache::new(config.eval_cache_limit.max(1)),
            killers: KillerTable::new(),
            history: HistoryTable::new(board.rows(), board.cols()),
            nodes: 0,
            start_time: AlphaBetaEngine::now(),
            time_limit,
            timed_out: false,
            max_depth: 0,
        }
    }

    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn elapsed_ms(&self) -> f64 {
        AlphaBetaEngine::now() - self.start_time
    }

    pub const fn keys(&self) -> &ZobristKeys {
        &self.keys
    }

    pub const fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    fn check_time(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(limit) = self.time_limit {
            let interval = u64::from(self.config.time_check_interval.max(1));
            if self.nodes % interval == 0 && self.elapsed_ms() > limit {
                self.timed_out = true;
            }
        }
        self.timed_out
    }

    fn margin(&self) -> usize {
        self.config.restriction_margin
    }

    fn root_restriction(&self, board: &Board) -> Restriction {
        Restriction::from_stones(board, self.margin()).unwrap_or_else(|| Restriction::full(board))
    }

    fn generate_moves(
        &self,
        board: &Board,
        player: Player,
        restriction: &Restriction,
        depth: u8,
    ) -> MoveList {
        MoveGenerator::new(self.config, self.evaluator).generate_moves(
            board,
            player,
            restriction,
            depth,
            &self.killers,
            &self.history,
        )
    }

    fn leaf_score(&mut self, board: &Board, player: Player, hash: u32, restriction: &Restriction) -> i32 {
        if let Some(score) = self.eval_cache.get(hash) {
            return score;
        }
        let score = self.evaluator.evaluate(board, player, restriction);
        self.eval_cache.insert(hash, score);
        score
    }

    /// Root call for one iteration: fresh hash and restriction from the
    /// stones on the board, answered as `BestMove` unless the clock trips or
    /// there is nothing to play.
    pub fn search_root(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        alpha: i32,
        beta: i32,
    ) -> SearchOutcome {
        self.max_depth = depth;
        let hash = self.keys.hash(board);
        let restriction = self.root_restriction(board);
        self.search(board, player, depth, alpha, beta, hash, restriction, None)
    }

    /// One iteration with an aspiration window around `previous`. Anything
    /// but a `BestMove` strictly inside the window is searched again with
    /// the full window.
    pub fn search_iteration(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        previous: Option<i32>,
    ) -> SearchOutcome {
        let margin = self.config.aspiration_window;
        if let Some(prev) = previous.filter(|_| margin > 0) {
            let alpha = prev.saturating_sub(margin).max(-INFINITY);
            let beta = prev.saturating_add(margin).min(INFINITY);
            match self.search_root(board, player, depth, alpha, beta) {
                SearchOutcome::BestMove(mv) if mv.score > alpha && mv.score < beta => {
                    return SearchOutcome::BestMove(mv);
                }
                SearchOutcome::TimedOut => return SearchOutcome::TimedOut,
                _ => {
                    log::debug!("aspiration miss at depth {depth} around {prev}, full re-search");
                }
            }
        }
        self.search_root(board, player, depth, -INFINITY, INFINITY)
    }

    /// Negamax over `board`, which is mutated in place and restored before
    /// returning. `last` is the stone the opponent just placed.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        hash: u32,
        restriction: Restriction,
        last: Option<(usize, usize)>,
    ) -> SearchOutcome {
        self.nodes += 1;

        if self.check_time() {
            return SearchOutcome::TimedOut;
        }

        let is_root = depth == self.max_depth;

        // TT Probe
        if !is_root {
            if let Some(entry) = self.tt.probe(hash) {
                if entry.depth >= depth {
                    match entry.flag {
                        TTFlag::Exact => return SearchOutcome::Scored(entry.score),
                        TTFlag::LowerBound => alpha = alpha.max(entry.score),
                        TTFlag::UpperBound => beta = beta.min(entry.score),
                    }
                    if alpha >= beta {
                        return SearchOutcome::Scored(entry.score);
                    }
                }
            }
        }

        // The opponent's last stone made five: this side has lost. Later
        // losses score higher, so the winner prefers the quickest win.
        if let Some((r, c)) = last {
            if check_win(board, r, c) {
                let ply = i32::from(self.max_depth.saturating_sub(depth));
                return SearchOutcome::Scored(-WIN_SCORE + ply);
            }
        }

        if depth == 0 {
            return SearchOutcome::Scored(self.leaf_score(board, player, hash, &restriction));
        }

        let moves = self.generate_moves(board, player, &restriction, depth);
        if moves.is_empty() {
            return SearchOutcome::Scored(0);
        }

        let alpha_window = alpha;
        let beta_window = beta;
        let opponent = player.opposite();
        let child_depth = depth - 1;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for (moves_searched, mv) in moves.into_iter().enumerate() {
            let (r, c) = (mv.row(), mv.col());
            board.place(r, c, player);
            let child_hash = hash ^ self.keys.key(r, c, player);
            let child_rect = restriction.expand(board, r, c, self.margin());
            let child_last = Some((r, c));

            let outcome = if moves_searched == 0 || self.config.algorithm == SearchAlgorithm::Negamax {
                self.search(board, opponent, child_depth, -beta, -alpha, child_hash, child_rect, child_last)
            } else {
                // Null window first; widen only if the move might beat alpha.
                match self.search(board, opponent, child_depth, -alpha - 1, -alpha, child_hash, child_rect, child_last) {
                    SearchOutcome::Scored(v) if -v > alpha && -v < beta => self.search(
                        board,
                        opponent,
                        child_depth,
                        -beta,
                        v,
                        child_hash,
                        child_rect,
                        child_last,
                    ),
                    other => other,
                }
            };

            board.remove(r, c);

            let score = match outcome {
                SearchOutcome::Scored(v) => -v,
                SearchOutcome::BestMove(child) => -child.score,
                SearchOutcome::TimedOut => return SearchOutcome::TimedOut,
            };

            if score > best_score {
                best_score = score;
                best_move = Some(Move { score, ..mv });
            }
            if score > alpha {
                alpha = score;
                self.history.bump(r, c, depth);
            }
            if alpha >= beta {
                self.killers.store(depth, mv);
                break;
            }
        }

        self.tt.store(
            hash,
            best_score,
            depth,
            TTFlag::classify(best_score, alpha_window, beta_window),
        );

        match best_move {
            Some(mv) if is_root => SearchOutcome::BestMove(mv),
            _ => SearchOutcome::Scored(best_score),
        }
    }

    /// Move to play when no iteration finished: the head of a fresh move
    /// ordering, or the empty cell nearest the center if every cell is
    /// pruned.
    pub fn fallback_move(&self, board: &Board, player: Player) -> Option<Move> {
        let restriction = self.root_restriction(board);
        let moves = self.generate_moves(board, player, &restriction, 1);
        if let Some(mv) = moves.first() {
            return Some(Move { score: 0, ..mv });
        }
        let (cr, cc) = board.center();
        board
            .empty_cells()
            .min_by_key(|&(r, c)| r.abs_diff(cr).max(c.abs_diff(cc)))
            .map(|(r, c)| Move::new(r, c, 0))
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        board: &Board,
        player: Player,
        limit: SearchLimit,
    ) -> Result<(Move, SearchStats), EngineError> {
        if board.is_full() {
            return Err(EngineError::BoardFull);
        }

        if board.is_empty() {
            let (row, col) = board.center();
            log::info!("empty board, opening at the center ({row}, {col})");
            return Ok((Move::new(row, col, 0), SearchStats::default()));
        }

        let cap = self.depth_cap();
        let (max_depth, time_limit) = match limit {
            SearchLimit::Depth(d) => (d.clamp(1, cap), None),
            #[allow(clippy::cast_precision_loss)]
            SearchLimit::Time(t) => (cap, Some(t as f64)),
        };
        let soft_limit = time_limit.map(|t| t * self.config.soft_time_ratio);

        // One copy per request; the search places and removes stones on it.
        let mut board = board.clone();
        let board = &mut board;
        let mut ctx = SearchContext::new(&self.config, &self.evaluator, board, time_limit);

        let mut best_move: Option<Move> = None;
        let mut final_depth = 0;
        let mut previous_score: Option<i32> = None;

        for d in iteration_depths(max_depth) {
            // Check soft limit before starting new depth
            if let Some(sl) = soft_limit {
                if ctx.elapsed_ms() > sl {
                    break;
                }
            }

            match ctx.search_iteration(board, player, d, previous_score) {
                SearchOutcome::BestMove(mv) => {
                    log::debug!(
                        "depth {d}: ({}, {}) score {} nodes {}",
                        mv.row,
                        mv.col,
                        mv.score,
                        ctx.nodes()
                    );
                    best_move = Some(mv);
                    final_depth = d;
                    previous_score = Some(mv.score);
                    // Forced losses stop too: deeper search cannot undo them.
                    if mv.score.abs() >= self.config.forced_win_threshold {
                        log::debug!("forced result at depth {d}, stopping");
                        break;
                    }
                }
                SearchOutcome::Scored(score) => {
                    log::debug!("depth {d}: no candidate at the root (score {score})");
                    break;
                }
                SearchOutcome::TimedOut => {
                    log::debug!("depth {d} timed out, keeping depth {final_depth}");
                    break;
                }
            }
        }

        let best = match best_move {
            Some(mv) => mv,
            None => {
                log::warn!("no search depth completed, using move ordering");
                ctx.fallback_move(board, player)
                    .ok_or(EngineError::BoardFull)?
            }
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let stats = SearchStats {
            depth: final_depth,
            nodes: ctx.nodes(),
            time_ms: ctx.elapsed_ms().max(0.0) as u64,
        };
        log::info!(
            "best move ({}, {}) score {} at depth {} ({} nodes, {} ms)",
            best.row,
            best.col,
            best.score,
            stats.depth,
            stats.nodes,
            stats.time_ms
        );
        Ok((best, stats))
    }
}
