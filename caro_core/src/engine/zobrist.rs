use crate::logic::board::{Board, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One random key per (cell, player). Built fresh for every request; pass a
/// seed to make hashes reproducible.
pub struct ZobristKeys {
    cols: usize,
    keys: Vec<[u32; 2]>,
}

impl ZobristKeys {
    pub fn new(rows: usize, cols: usize, seed: Option<u64>) -> Self {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let keys = (0..rows * cols).map(|_| [rng.gen(), rng.gen()]).collect();
        Self { cols, keys }
    }

    pub fn for_board(board: &Board, seed: Option<u64>) -> Self {
        Self::new(board.rows(), board.cols(), seed)
    }

    pub fn key(&self, row: usize, col: usize, player: Player) -> u32 {
        self.keys
            .get(row * self.cols + col)
            .and_then(|k| k.get(player.index()))
            .copied()
            .unwrap_or(0)
    }

    /// Full hash of a position; the search keeps it up to date with
    /// `hash ^ key(row, col, player)` on every place and undo.
    pub fn hash(&self, board: &Board) -> u32 {
        board
            .stones()
            .fold(0, |hash, (r, c, p)| hash ^ self.key(r, c, p))
    }
}
