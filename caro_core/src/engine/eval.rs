use crate::engine::config::EngineConfig;
use crate::engine::{Evaluator, MoveEval};
use crate::logic::board::{Board, Cell, Player};
use crate::logic::eval_constants::{WINDOW_EMPTY, WINDOW_OPPONENT, WINDOW_OWN};
use crate::logic::restriction::Restriction;
use crate::logic::rules::{count_direction, DIRECTIONS, WIN_LENGTH};
use std::sync::Arc;

pub struct PatternEvaluator {
    run_values: [[i32; 4]; 3],
    five: i32,
}

impl PatternEvaluator {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            run_values: config.run_values(),
            five: config.val_five,
        }
    }

    fn run_value(&self, length: usize, blocked_ends: usize) -> i32 {
        if length >= WIN_LENGTH {
            return self.five;
        }
        self.run_values
            .get(blocked_ends)
            .and_then(|row| row.get(length.wrapping_sub(1)))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of run values for every maximal line of `player` stones that
    /// starts inside `restriction`. The board edge blocks like an opponent
    /// stone.
    #[allow(clippy::cast_possible_wrap)]
    pub fn player_total(&self, board: &Board, player: Player, restriction: &Restriction) -> i32 {
        let mut total = 0;
        for (r, c) in restriction.cells() {
            if board.get(r, c) != Some(player) {
                continue;
            }
            let (ri, ci) = (r as isize, c as isize);
            for (dr, dc) in DIRECTIONS {
                let before = board.cell(ri - dr, ci - dc);
                if before == Cell::Stone(player) {
                    continue; // not the start of the run
                }
                let length = 1 + count_direction(board, r, c, dr, dc, player);
                let reach = length as isize;
                let after = board.cell(ri + dr * reach, ci + dc * reach);
                let blocked = usize::from(before != Cell::Empty) + usize::from(after != Cell::Empty);
                total += self.run_value(length, blocked);
            }
        }
        total
    }
}

impl Evaluator for PatternEvaluator {
    fn evaluate(&self, board: &Board, player: Player, restriction: &Restriction) -> i32 {
        self.player_total(board, player, restriction)
            - self.player_total(board, player.opposite(), restriction)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn evaluate_move(&self, board: &Board, row: usize, col: usize, player: Player) -> MoveEval {
        let (r0, c0) = (row as isize, col as isize);
        let span = WIN_LENGTH as isize;
        let mut score = 0;

        for (dr, dc) in DIRECTIONS {
            // Every five-cell window on this line that contains the candidate.
            for start in (1 - span)..=0 {
                let mut own = 0;
                let mut opponent = 0;
                let mut on_board = true;
                for k in start..start + span {
                    if k == 0 {
                        continue;
                    }
                    match board.cell(r0 + dr * k, c0 + dc * k) {
                        Cell::Wall => {
                            on_board = false;
                            break;
                        }
                        Cell::Empty => {}
                        Cell::Stone(p) if p == player => own += 1,
                        Cell::Stone(_) => opponent += 1,
                    }
                }
                if !on_board {
                    continue;
                }
                score += match (own, opponent) {
                    (4, 0) => return MoveEval::Win,
                    (0, 0) => WINDOW_EMPTY,
                    (n, 0) => WINDOW_OWN.get(n).copied().unwrap_or(0),
                    (0, n) => WINDOW_OPPONENT.get(n).copied().unwrap_or(0),
                    _ => 0,
                };
            }
        }

        MoveEval::Score(score)
    }
}
