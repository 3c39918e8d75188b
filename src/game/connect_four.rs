//! Connect-Four rules
//!
//! Cells are stored row-major with row 0 at the top, so tokens fall towards
//! the highest row index. A full board with no line replays the round.

use super::{MoveError, Side, SnapshotError};

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;
pub const CELLS: usize = COLUMNS * ROWS;

/// Side that moves first in every round (red)
pub const STARTING_SIDE: Side = Side::A;

/// Where a token came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drop {
    pub column: usize,
    pub row: usize,
    pub winner: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectFour {
    cells: [Option<Side>; CELLS],
    round: u32,
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectFour {
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
            round: 1,
        }
    }

    pub fn index(row: usize, column: usize) -> usize {
        row * COLUMNS + column
    }

    pub fn cells(&self) -> &[Option<Side>; CELLS] {
        &self.cells
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Side> {
        self.cells[Self::index(row, column)]
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Row a token dropped into `column` would land on
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= COLUMNS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.get(row, column).is_none())
    }

    pub fn check_move(&self, column: usize) -> Result<usize, MoveError> {
        if column >= COLUMNS {
            return Err(MoveError::OutOfRange(column));
        }
        self.landing_row(column).ok_or(MoveError::ColumnFull(column))
    }

    /// Columns that still accept a token
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLUMNS).filter(|&c| self.landing_row(c).is_some()).collect()
    }

    pub fn apply_move(&mut self, side: Side, column: usize) -> Result<Drop, MoveError> {
        let row = self.check_move(column)?;
        self.cells[Self::index(row, column)] = Some(side);
        Ok(Drop {
            column,
            row,
            winner: self.winner(),
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// First four-in-a-row found scanning rows top to bottom; at each start
    /// cell horizontal, vertical, then both diagonals are tried.
    pub fn winner(&self) -> Option<Side> {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        for row in 0..ROWS {
            for column in 0..COLUMNS {
                let Some(side) = self.get(row, column) else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    let line = (1..4).all(|step| {
                        let r = row as isize + dr * step;
                        let c = column as isize + dc * step;
                        (0..ROWS as isize).contains(&r)
                            && (0..COLUMNS as isize).contains(&c)
                            && self.get(r as usize, c as usize) == Some(side)
                    });
                    if line {
                        return Some(side);
                    }
                }
            }
        }
        None
    }

    /// Clear the board for a replayed round. The next mover is always
    /// [`STARTING_SIDE`], not whoever would have moved next.
    pub fn reset_round(&mut self) -> Side {
        self.cells = [None; CELLS];
        self.round += 1;
        STARTING_SIDE
    }

    /// Adopt an authoritative board, optionally with its round counter
    pub fn replace_board(
        &mut self,
        board: &[Option<Side>],
        round: Option<u32>,
    ) -> Result<(), SnapshotError> {
        if board.len() != CELLS {
            return Err(SnapshotError::BoardLength {
                expected: CELLS,
                got: board.len(),
            });
        }
        self.cells.copy_from_slice(board);
        if let Some(round) = round {
            self.round = round;
        }
        Ok(())
    }
}
