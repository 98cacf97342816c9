use crate::engine::Move;
use crate::logic::board::MAX_BOARD_SIZE;
use std::ops::Index;

// Every cell of the largest supported board.
const MAX_MOVES: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

pub struct MoveList {
    pub moves: [Move; MAX_MOVES],
    pub count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [Move::default(); MAX_MOVES],
            count: 0,
        }
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(mv: Move) -> Self {
        let mut list = Self::new();
        list.push(mv);
        list
    }

    pub fn push(&mut self, mv: Move) {
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = mv;
            self.count += 1;
        } else {
            debug_assert!(false, "MoveList overflow! Max moves: {MAX_MOVES}");
        }
    }

    pub const fn truncate(&mut self, len: usize) {
        if len < self.count {
            self.count = len;
        }
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    pub fn as_slice(&self) -> &[Move] {
        self.moves.get(0..self.count).unwrap_or(&[])
    }

    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        self.moves.get_mut(0..self.count).unwrap_or(&mut [])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Move> {
        self.as_mut_slice().iter_mut()
    }

    pub fn position(&self, row: u8, col: u8) -> Option<usize> {
        self.iter().position(|m| m.row == row && m.col == col)
    }

    /// Stable sort, highest score first.
    pub fn sort_by_score(&mut self) {
        self.as_mut_slice().sort_by(|a, b| b.score.cmp(&a.score));
    }

    /// Moves the entry at `index` to the front, keeping the order of the rest.
    pub fn move_to_front(&mut self, index: usize) {
        if let Some(prefix) = self.moves.get_mut(0..=index) {
            if index < self.count {
                prefix.rotate_right(1);
            }
        }
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        self.moves.get(index).unwrap_or(&self.moves[0]) // Fallback to 0th element (dummy) instead of panic
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::iter::Take<std::array::IntoIter<Move, MAX_MOVES>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter().take(self.count)
    }
}
