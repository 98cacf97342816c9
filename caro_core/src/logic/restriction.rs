use crate::logic::board::Board;

/// Rectangle of "interesting" cells: the bounding box of every stone grown by
/// a margin and clamped to the board. Inclusive on all four sides.
///
/// It is a plain value: the search hands an expanded copy to each child, so
/// undoing a move needs no bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl Restriction {
    /// The whole board.
    pub const fn full(board: &Board) -> Self {
        Self {
            min_row: 0,
            min_col: 0,
            max_row: board.rows() - 1,
            max_col: board.cols() - 1,
        }
    }

    /// The margin-sized square around one cell, clamped to the board.
    pub fn around(board: &Board, row: usize, col: usize, margin: usize) -> Self {
        Self {
            min_row: row.saturating_sub(margin),
            min_col: col.saturating_sub(margin),
            max_row: row.saturating_add(margin).min(board.rows() - 1),
            max_col: col.saturating_add(margin).min(board.cols() - 1),
        }
    }

    /// Bounding box of all stones plus `margin`, or `None` on an empty board.
    pub fn from_stones(board: &Board, margin: usize) -> Option<Self> {
        board
            .stones()
            .fold(None, |acc: Option<Self>, (r, c, _)| match acc {
                None => Some(Self::around(board, r, c, margin)),
                Some(rect) => Some(rect.expand(board, r, c, margin)),
            })
    }

    /// Smallest rectangle covering `self` and the margin around `(row, col)`.
    #[must_use]
    pub fn expand(self, board: &Board, row: usize, col: usize, margin: usize) -> Self {
        let around = Self::around(board, row, col, margin);
        Self {
            min_row: self.min_row.min(around.min_row),
            min_col: self.min_col.min(around.min_col),
            max_row: self.max_row.max(around.max_row),
            max_col: self.max_col.max(around.max_col),
        }
    }

    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }

    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.min_row..=self.max_row)
            .flat_map(move |r| (self.min_col..=self.max_col).map(move |c| (r, c)))
    }

    pub const fn area(&self) -> usize {
        (self.max_row - self.min_row + 1) * (self.max_col - self.min_col + 1)
    }
}
