use crate::logic::board::{Board, Cell, Player};

/// Stones in a row needed to win. Longer lines also win.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, main diagonal, anti-diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Number of consecutive `player` stones starting one step away from
/// `(row, col)` in direction `(dr, dc)`.
pub fn count_direction(
    board: &Board,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
    player: Player,
) -> usize {
    let (Ok(mut r), Ok(mut c)) = (isize::try_from(row), isize::try_from(col)) else {
        return 0;
    };
    let mut count = 0;
    loop {
        r += dr;
        c += dc;
        if board.cell(r, c) != Cell::Stone(player) {
            return count;
        }
        count += 1;
    }
}

/// Whether the stone at `(row, col)` is part of five or more in a line.
/// Only the lines through that cell are examined, so call it with the
/// coordinates of the last stone placed.
pub fn check_win(board: &Board, row: usize, col: usize) -> bool {
    let Some(player) = board.get(row, col) else {
        return false;
    };
    DIRECTIONS.iter().any(|&(dr, dc)| {
        1 + count_direction(board, row, col, dr, dc, player)
            + count_direction(board, row, col, -dr, -dc, player)
            >= WIN_LENGTH
    })
}

/// A cell is remote when no stone of either side lies within `radius`
/// (Chebyshev distance). Remote cells are never offered as candidates, which
/// drops some legal moves far away from play.
pub fn is_remote(board: &Board, row: usize, col: usize, radius: usize) -> bool {
    let r0 = row.saturating_sub(radius);
    let c0 = col.saturating_sub(radius);
    let r1 = row.saturating_add(radius).min(board.rows() - 1);
    let c1 = col.saturating_add(radius).min(board.cols() - 1);
    for r in r0..=r1 {
        for c in c0..=c1 {
            if (r, c) != (row, col) && board.get(r, c).is_some() {
                return false;
            }
        }
    }
    true
}
