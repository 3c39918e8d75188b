//! Tic-tac-toe with piece decay
//!
//! Each side may hold at most [`MAX_MARKS`] marks. Placing another one first
//! evicts that side's oldest mark, so the board never fills up and the game
//! only ends on a win.

use std::collections::VecDeque;

use super::{MoveError, Side, SnapshotError};

/// Number of cells on the board
pub const CELLS: usize = 9;

/// Marks a side may hold at once
pub const MAX_MARKS: usize = 3;

/// Winning lines in scan order: rows, columns, diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [Option<Side>; CELLS],
    history_a: VecDeque<usize>,
    history_b: VecDeque<usize>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Side>; CELLS] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Side> {
        self.cells.get(index).copied().flatten()
    }

    /// Placement order of a side's marks, oldest first
    pub fn history(&self, side: Side) -> &VecDeque<usize> {
        match side {
            Side::A => &self.history_a,
            Side::B => &self.history_b,
        }
    }

    fn history_mut(&mut self, side: Side) -> &mut VecDeque<usize> {
        match side {
            Side::A => &mut self.history_a,
            Side::B => &mut self.history_b,
        }
    }

    pub fn mark_count(&self, side: Side) -> usize {
        self.cells.iter().filter(|c| **c == Some(side)).count()
    }

    /// Empty cells in index order
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// Validate a placement without touching the board
    pub fn check_move(&self, cell: usize) -> Result<(), MoveError> {
        match self.cells.get(cell) {
            None => Err(MoveError::OutOfRange(cell)),
            Some(Some(_)) => Err(MoveError::Occupied(cell)),
            Some(None) => Ok(()),
        }
    }

    /// Cell that placing one more mark for `side` would evict
    pub fn pending_eviction(&self, side: Side) -> Option<usize> {
        let history = self.history(side);
        if history.len() >= MAX_MARKS {
            history.front().copied()
        } else {
            None
        }
    }

    /// First step of a move: drop the side's oldest mark if it is at the cap.
    pub fn evict_oldest(&mut self, side: Side) -> Option<usize> {
        self.pending_eviction(side)?;
        let cell = self.history_mut(side).pop_front()?;
        self.cells[cell] = None;
        Some(cell)
    }

    /// Second step of a move: place the mark and run win detection on the
    /// resulting board. Callers run [`Self::evict_oldest`] first.
    pub fn place(&mut self, side: Side, cell: usize) -> Result<Option<Side>, MoveError> {
        self.check_move(cell)?;
        if self.history(side).len() >= MAX_MARKS {
            return Err(MoveError::DecayPending);
        }
        self.cells[cell] = Some(side);
        self.history_mut(side).push_back(cell);
        Ok(self.winner())
    }

    /// First complete line in scan order
    pub fn winner(&self) -> Option<Side> {
        LINES.iter().find_map(|[a, b, c]| {
            let side = self.cells[*a]?;
            (self.cells[*b] == Some(side) && self.cells[*c] == Some(side)).then_some(side)
        })
    }

    /// Adopt an authoritative board.
    ///
    /// With explicit histories they are taken as-is. Otherwise the known
    /// order of surviving marks is kept and newly seen marks are appended in
    /// index order.
    pub fn replace_board(
        &mut self,
        board: &[Option<Side>],
        moves_a: Option<&[usize]>,
        moves_b: Option<&[usize]>,
    ) -> Result<(), SnapshotError> {
        if board.len() != CELLS {
            return Err(SnapshotError::BoardLength {
                expected: CELLS,
                got: board.len(),
            });
        }
        let mut cells = [None; CELLS];
        cells.copy_from_slice(board);

        let rebuild = |side: Side,
                       previous: &VecDeque<usize>,
                       explicit: Option<&[usize]>|
         -> VecDeque<usize> {
            if let Some(moves) = explicit {
                return moves.iter().copied().filter(|&i| cells.get(i) == Some(&Some(side))).collect();
            }
            let mut history: VecDeque<usize> = previous
                .iter()
                .copied()
                .filter(|&i| cells[i] == Some(side))
                .collect();
            for (i, cell) in cells.iter().enumerate() {
                if *cell == Some(side) && !history.contains(&i) {
                    history.push_back(i);
                }
            }
            history
        };

        let history_a = rebuild(Side::A, &self.history_a, moves_a);
        let history_b = rebuild(Side::B, &self.history_b, moves_b);
        self.cells = cells;
        self.history_a = history_a;
        self.history_b = history_b;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Evict then place in one go; returns the freed cell and any winner
    fn play(
        game: &mut TicTacToe,
        side: Side,
        cell: usize,
    ) -> Result<(Option<usize>, Option<Side>), MoveError> {
        game.check_move(cell)?;
        let evicted = game.evict_oldest(side);
        let winner = game.place(side, cell)?;
        Ok((evicted, winner))
    }

    /// Same board with every mark handed to the other side
    fn mirrored(game: &TicTacToe) -> TicTacToe {
        let mut cells = [None; CELLS];
        for (dst, src) in cells.iter_mut().zip(game.cells.iter()) {
            *dst = src.map(Side::opponent);
        }
        TicTacToe {
            cells,
            history_a: game.history_b.clone(),
            history_b: game.history_a.clone(),
        }
    }

    fn board_with(marks: &[(usize, Side)]) -> TicTacToe {
        let mut game = TicTacToe::new();
        for &(cell, side) in marks {
            play(&mut game, side, cell).unwrap();
        }
        game
    }

    #[test]
    fn empty_board_has_no_winner() {
        assert_eq!(TicTacToe::new().winner(), None);
    }

    #[test]
    fn detects_column() {
        let game = board_with(&[(1, Side::B), (4, Side::B), (7, Side::B)]);
        assert_eq!(game.winner(), Some(Side::B));
    }

    #[test]
    fn rejects_occupied_and_out_of_range() {
        let mut game = board_with(&[(4, Side::A)]);
        assert_eq!(play(&mut game, Side::B, 4), Err(MoveError::Occupied(4)));
        assert_eq!(play(&mut game, Side::B, 9), Err(MoveError::OutOfRange(9)));
        assert_eq!(game.mark_count(Side::B), 0);
    }

    #[test]
    fn fourth_mark_evicts_oldest() {
        let mut game = board_with(&[(0, Side::A), (5, Side::A), (7, Side::A)]);
        let (evicted, _) = play(&mut game, Side::A, 2).unwrap();
        assert_eq!(evicted, Some(0));
        assert_eq!(game.cell(0), None);
        assert_eq!(game.history(Side::A), &VecDeque::from(vec![5, 7, 2]));
    }

    #[test]
    fn win_is_checked_after_eviction() {
        // A holds 0,1,5; placing 2 would complete the top row only if 0 survived.
        let mut game = board_with(&[(0, Side::A), (1, Side::A), (5, Side::A)]);
        assert_eq!(play(&mut game, Side::A, 2), Ok((Some(0), None)));
    }

    #[test]
    fn place_refuses_to_skip_decay() {
        let mut game = board_with(&[(0, Side::A), (1, Side::A), (5, Side::A)]);
        assert_eq!(game.place(Side::A, 8), Err(MoveError::DecayPending));
    }

    #[test]
    fn replace_board_keeps_known_order() {
        let mut game = board_with(&[(8, Side::A), (0, Side::A)]);
        let mut board = vec![None; CELLS];
        board[8] = Some(Side::A);
        board[0] = Some(Side::A);
        board[3] = Some(Side::A);
        board[4] = Some(Side::B);
        game.replace_board(&board, None, None).unwrap();
        assert_eq!(game.history(Side::A), &VecDeque::from(vec![8, 0, 3]));
        assert_eq!(game.history(Side::B), &VecDeque::from(vec![4]));
    }

    #[test]
    fn replace_board_rejects_wrong_length() {
        let mut game = TicTacToe::new();
        let err = game.replace_board(&[None; 4], None, None).unwrap_err();
        assert_eq!(err, SnapshotError::BoardLength { expected: 9, got: 4 });
    }

    proptest! {
        #[test]
        fn no_side_exceeds_three_marks(moves in proptest::collection::vec(0usize..9, 0..60)) {
            let mut game = TicTacToe::new();
            let mut side = Side::A;
            for cell in moves {
                if play(&mut game, side, cell).is_ok() {
                    side = side.opponent();
                }
                prop_assert!(game.mark_count(Side::A) <= MAX_MARKS);
                prop_assert!(game.mark_count(Side::B) <= MAX_MARKS);
            }
        }

        #[test]
        fn winner_flips_under_mirror(cells in proptest::collection::vec(0u8..3, 9)) {
            let mut board = vec![None; CELLS];
            for (i, c) in cells.iter().enumerate() {
                board[i] = match c {
                    1 => Some(Side::A),
                    2 => Some(Side::B),
                    _ => None,
                };
            }
            let mut game = TicTacToe::new();
            game.replace_board(&board, None, None).unwrap();
            prop_assert_eq!(mirrored(&game).winner(), game.winner().map(Side::opponent));
        }
    }
}
