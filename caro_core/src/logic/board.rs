use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_BOARD_SIZE: usize = 5;
pub const MAX_BOARD_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }

    /// Wire value: `X` is `+1`, `O` is `-1`.
    pub const fn value(self) -> i32 {
        match self {
            Self::X => 1,
            Self::O => -1,
        }
    }

    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::X),
            -1 => Some(Self::O),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::X => 'x',
            Self::O => 'o',
        }
    }
}

/// What a coordinate holds, with off-board reads reported as a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Empty,
    Stone(Player),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("board is {rows}x{cols}, supported sizes are {min}..={max} per side", min = MIN_BOARD_SIZE, max = MAX_BOARD_SIZE)]
    UnsupportedSize { rows: usize, cols: usize },
    #[error("cell ({row}, {col}) holds {value}, expected -1, 0 or 1")]
    InvalidCell { row: usize, col: usize, value: i32 },
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    InvalidSymbol { row: usize, col: usize, ch: char },
}

/// Fixed-size grid mutated in place by the search (place/remove, no cloning
/// per node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Option<Player>>,
    stones: usize,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&rows)
            || !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&cols)
        {
            return Err(BoardError::UnsupportedSize { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            grid: vec![None; rows * cols],
            stones: 0,
        })
    }

    /// Builds a board from the wire format (`1` = X, `-1` = O, `0` = empty).
    pub fn from_grid(grid: &[Vec<i32>]) -> Result<Self, BoardError> {
        let first = grid.first().ok_or(BoardError::Empty)?;
        let expected = first.len();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != expected {
                return Err(BoardError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }

        let mut board = Self::new(grid.len(), expected)?;
        for (row, cells) in grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                match value {
                    0 => {}
                    v => {
                        let player = Player::from_value(v)
                            .ok_or(BoardError::InvalidCell { row, col, value })?;
                        board.place(row, col, player);
                    }
                }
            }
        }
        Ok(board)
    }

    /// Parses the text form: one line per row, `x`, `o` and `.` for cells.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let mut grid = Vec::new();
        for (row, line) in text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
        {
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let value = match ch.to_ascii_lowercase() {
                    'x' => 1,
                    'o' => -1,
                    '.' => 0,
                    _ => return Err(BoardError::InvalidSymbol { row, col, ch }),
                };
                cells.push(value);
            }
            grid.push(cells);
        }
        Self::from_grid(&grid)
    }

    pub fn to_grid(&self) -> Vec<Vec<i32>> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| self.get(r, c).map_or(0, Player::value))
                    .collect()
            })
            .collect()
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn stone_count(&self) -> usize {
        self.stones
    }

    pub const fn is_empty(&self) -> bool {
        self.stones == 0
    }

    pub const fn is_full(&self) -> bool {
        self.stones == self.rows * self.cols
    }

    pub const fn center(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    pub const fn square_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if col >= self.cols {
            return None;
        }
        self.grid
            .get(self.square_index(row, col))
            .copied()
            .flatten()
    }

    /// Signed lookup for line scans that may step off the board.
    pub fn cell(&self, row: isize, col: isize) -> Cell {
        let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) else {
            return Cell::Wall;
        };
        if !self.contains(r, c) {
            return Cell::Wall;
        }
        self.get(r, c).map_or(Cell::Empty, Cell::Stone)
    }

    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.contains(row, col) && self.get(row, col).is_none()
    }

    pub fn place(&mut self, row: usize, col: usize, player: Player) {
        let sq = self.square_index(row, col);
        if let Some(slot) = self.grid.get_mut(sq) {
            debug_assert!(slot.is_none(), "place on occupied cell ({row}, {col})");
            if slot.is_none() {
                self.stones += 1;
            }
            *slot = Some(player);
        }
    }

    pub fn remove(&mut self, row: usize, col: usize) -> Option<Player> {
        let sq = self.square_index(row, col);
        let removed = self.grid.get_mut(sq).and_then(Option::take);
        if removed.is_some() {
            self.stones -= 1;
        }
        removed
    }

    pub fn stones(&self) -> impl Iterator<Item = (usize, usize, Player)> + '_ {
        let cols = self.cols;
        self.grid
            .iter()
            .enumerate()
            .filter_map(move |(sq, cell)| cell.map(|p| (sq / cols, sq % cols, p)))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(move |(sq, _)| (sq / cols, sq % cols))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f)?;
            }
            for c in 0..self.cols {
                let ch = self.get(r, c).map_or('.', Player::symbol);
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}
