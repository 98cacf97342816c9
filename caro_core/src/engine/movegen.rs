use crate::engine::config::EngineConfig;
use crate::engine::move_list::MoveList;
use crate::engine::{Evaluator, Move, MoveEval};
use crate::logic::board::{Board, Player};
use crate::logic::eval_constants::WIN_SCORE;
use crate::logic::restriction::Restriction;
use crate::logic::rules::is_remote;

/// Deepest remaining depth the killer table tracks.
pub const MAX_PLY: usize = 64;

/// Up to two cutoff moves per remaining depth, most recent first.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    pub const fn new() -> Self {
        Self {
            slots: [[None; 2]; MAX_PLY],
        }
    }

    pub fn get(&self, depth: u8) -> [Option<Move>; 2] {
        self.slots
            .get(usize::from(depth))
            .copied()
            .unwrap_or([None; 2])
    }

    pub fn store(&mut self, depth: u8, mv: Move) {
        // Shift: 0 -> 1, New -> 0
        if let Some(killers) = self.slots.get_mut(usize::from(depth)) {
            if !killers[0].is_some_and(|k| k.same_cell(&mv)) {
                killers[1] = killers[0];
                killers[0] = Some(mv);
            }
        }
    }
}

/// Per-cell reward for moves that raised alpha.
pub struct HistoryTable {
    cols: usize,
    scores: Vec<i32>,
}

impl HistoryTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            scores: vec![0; rows * cols],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.scores.get(row * self.cols + col).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, row: usize, col: usize, depth: u8) {
        let depth = i32::from(depth);
        if let Some(s) = self.scores.get_mut(row * self.cols + col) {
            *s = s.saturating_add(depth * depth);
        }
    }
}

pub struct MoveGenerator<'a, E: Evaluator> {
    config: &'a EngineConfig,
    evaluator: &'a E,
}

impl<'a, E: Evaluator> MoveGenerator<'a, E> {
    pub const fn new(config: &'a EngineConfig, evaluator: &'a E) -> Self {
        Self { config, evaluator }
    }

    /// Ordered candidates for `player`: empty, non-remote cells inside
    /// `restriction`, best first. A winning cell is returned on its own.
    pub fn generate_moves(
        &self,
        board: &Board,
        player: Player,
        restriction: &Restriction,
        depth: u8,
        killers: &KillerTable,
        history: &HistoryTable,
    ) -> MoveList {
        let mut moves = MoveList::new();

        for (r, c) in restriction.cells() {
            if board.get(r, c).is_some() {
                continue;
            }
            if self.config.prune_remote && is_remote(board, r, c, self.config.remote_radius) {
                continue;
            }
            match self.evaluator.evaluate_move(board, r, c, player) {
                MoveEval::Win => return MoveList::single(Move::new(r, c, WIN_SCORE)),
                MoveEval::Score(score) => {
                    let bonus = history.get(r, c).saturating_mul(self.config.history_weight);
                    moves.push(Move::new(r, c, score.saturating_add(bonus)));
                }
            }
        }

        moves.sort_by_score();

        // Older killer first so the most recent one ends up in front.
        for killer in killers.get(depth).iter().rev().flatten() {
            if let Some(idx) = moves.position(killer.row, killer.col) {
                moves.move_to_front(idx);
            }
        }

        if let Some(limit) = self.config.max_candidates {
            moves.truncate(limit.max(1));
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::eval::PatternEvaluator;
    use std::sync::Arc;

    fn setup(config: EngineConfig) -> (Arc<EngineConfig>, PatternEvaluator) {
        let config = Arc::new(config);
        let evaluator = PatternEvaluator::new(config.clone());
        (config, evaluator)
    }

    fn cells(moves: &MoveList) -> Vec<(u8, u8)> {
        moves.iter().map(|m| (m.row, m.col)).collect()
    }

    #[test]
    fn test_immediate_win_short_circuits() {
        let (config, evaluator) = setup(EngineConfig::default());
        let generator = MoveGenerator::new(&config, &evaluator);
        let board = Board::parse(
            "
            .........
            .........
            .xxxx....
            .ooo.....
            .........
            .........
            ",
        )
        .unwrap();
        let rect = Restriction::from_stones(&board, 2).unwrap();
        let moves = generator.generate_moves(
            &board,
            Player::X,
            &rect,
            2,
            &KillerTable::new(),
            &HistoryTable::new(6, 9),
        );
        assert_eq!(moves.len(), 1);
        let only = moves[0];
        assert!(only.row == 2 && (only.col == 0 || only.col == 5));
        assert_eq!(only.score, WIN_SCORE);
    }

    #[test]
    fn test_remote_cells_are_pruned_unless_disabled() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(7, 7, Player::X);
        let rect = Restriction::full(&board);
        let killers = KillerTable::new();
        let history = HistoryTable::new(15, 15);

        let (config, evaluator) = setup(EngineConfig {
            max_candidates: None,
            ..EngineConfig::default()
        });
        let moves = MoveGenerator::new(&config, &evaluator).generate_moves(
            &board,
            Player::O,
            &rect,
            1,
            &killers,
            &history,
        );
        // 5x5 square around the stone, minus the stone itself.
        assert_eq!(moves.len(), 24);
        assert!(moves.iter().all(|m| !is_remote(&board, m.row(), m.col(), 2)));

        let (config, evaluator) = setup(EngineConfig {
            max_candidates: None,
            prune_remote: false,
            ..EngineConfig::default()
        });
        let moves = MoveGenerator::new(&config, &evaluator).generate_moves(
            &board,
            Player::O,
            &rect,
            1,
            &killers,
            &history,
        );
        assert_eq!(moves.len(), 224);
    }

    #[test]
    fn test_truncates_to_max_candidates() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(7, 7, Player::X);
        board.place(7, 8, Player::O);
        let rect = Restriction::from_stones(&board, 2).unwrap();
        let (config, evaluator) = setup(EngineConfig {
            max_candidates: Some(5),
            ..EngineConfig::default()
        });
        let moves = MoveGenerator::new(&config, &evaluator).generate_moves(
            &board,
            Player::X,
            &rect,
            3,
            &KillerTable::new(),
            &HistoryTable::new(15, 15),
        );
        assert_eq!(moves.len(), 5);
        for pair in moves.as_slice().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_killers_are_promoted_most_recent_first() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(7, 7, Player::X);
        let rect = Restriction::from_stones(&board, 2).unwrap();
        let (config, evaluator) = setup(EngineConfig {
            max_candidates: None,
            ..EngineConfig::default()
        });
        let generator = MoveGenerator::new(&config, &evaluator);
        let history = HistoryTable::new(15, 15);

        let mut killers = KillerTable::new();
        killers.store(4, Move::new(5, 5, 0));
        killers.store(4, Move::new(9, 9, 0));
        // Re-storing the newest killer does not duplicate it.
        killers.store(4, Move::new(9, 9, 0));

        let moves = generator.generate_moves(&board, Player::O, &rect, 4, &killers, &history);
        assert_eq!(cells(&moves)[..2], [(9, 9), (5, 5)]);

        // Other depths are untouched.
        let plain = generator.generate_moves(
            &board,
            Player::O,
            &rect,
            3,
            &KillerTable::new(),
            &history,
        );
        let at_depth_3 = generator.generate_moves(&board, Player::O, &rect, 3, &killers, &history);
        assert_eq!(cells(&plain), cells(&at_depth_3));
    }

    #[test]
    fn test_history_bonus_reorders_candidates() {
        let mut board = Board::new(15, 15).unwrap();
        board.place(7, 7, Player::X);
        let rect = Restriction::from_stones(&board, 2).unwrap();
        let (config, evaluator) = setup(EngineConfig {
            max_candidates: None,
            ..EngineConfig::default()
        });
        let generator = MoveGenerator::new(&config, &evaluator);
        let killers = KillerTable::new();

        let mut history = HistoryTable::new(15, 15);
        for _ in 0..50 {
            history.bump(5, 9, 6);
        }
        assert_eq!(history.get(5, 9), 50 * 36);

        let moves = generator.generate_moves(&board, Player::O, &rect, 2, &killers, &history);
        assert_eq!((moves[0].row, moves[0].col), (5, 9));
    }

    #[test]
    fn test_full_neighbourhood_yields_no_moves() {
        let board = Board::parse(
            "
            xoxox
            oxoxo
            xoxox
            oxoxo
            xoxox
            ",
        )
        .unwrap();
        let (config, evaluator) = setup(EngineConfig::default());
        let moves = MoveGenerator::new(&config, &evaluator).generate_moves(
            &board,
            Player::X,
            &Restriction::full(&board),
            1,
            &KillerTable::new(),
            &HistoryTable::new(5, 5),
        );
        assert!(moves.is_empty());
    }
}
