//! Local opponent for offline play: a uniformly random legal move, no lookahead

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{Choice, GameState, PlayerMove, Side};

/// How the local opponent picks moves
#[derive(Debug, Clone)]
pub enum OpponentPolicy {
    /// Random legal move from a seeded generator
    Random { seed: u64 },
    /// Replay fixed moves, falling back to random once they run out or turn
    /// out to be illegal
    Scripted { moves: Vec<PlayerMove>, seed: u64 },
}

impl Default for OpponentPolicy {
    fn default() -> Self {
        OpponentPolicy::Random {
            seed: rand::random(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalOpponent {
    side: Side,
    rng: ChaCha8Rng,
    script: VecDeque<PlayerMove>,
}

impl LocalOpponent {
    pub fn new(side: Side, policy: OpponentPolicy) -> Self {
        let (seed, script) = match policy {
            OpponentPolicy::Random { seed } => (seed, VecDeque::new()),
            OpponentPolicy::Scripted { moves, seed } => (seed, moves.into()),
        };
        Self {
            side,
            rng: ChaCha8Rng::seed_from_u64(seed),
            script,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Next move for the current position, `None` if nothing is legal
    pub fn choose(&mut self, game: &GameState) -> Option<PlayerMove> {
        while let Some(mv) = self.script.pop_front() {
            if game.check_local_move(self.side, mv).is_ok() {
                return Some(mv);
            }
        }

        match game {
            GameState::TicTacToe(board) => {
                board.empty_cells().choose(&mut self.rng).copied().map(PlayerMove::Cell)
            }
            GameState::ConnectFour(board) => {
                board.open_columns().choose(&mut self.rng).copied().map(PlayerMove::Column)
            }
            GameState::Rps(_) => Choice::ALL.choose(&mut self.rng).copied().map(PlayerMove::Throw),
        }
    }
}
