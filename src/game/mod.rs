//! Game rules, pacing and the match session

pub mod ai;
pub mod clock;
pub mod connect_four;
pub mod reconcile;
pub mod rps;
pub mod session;
pub mod tictactoe;
pub mod timeline;

pub use ai::{LocalOpponent, OpponentPolicy};
pub use clock::{ClockState, TurnClock};
pub use connect_four::ConnectFour;
pub use reconcile::{Dependency, Reconciler};
pub use rps::{Choice, RockPaperScissors};
pub use session::{
    Effect, LocalInput, MatchSession, Notice, SessionMode, SessionPhase, SessionSettings, Settlement,
    TransportStatus,
};
pub use tictactoe::TicTacToe;
pub use timeline::{Step, Timeline};

use serde::{Deserialize, Serialize};

use crate::ws::protocol::BoardState;

/// One of the two seats in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "a", alias = "A")]
    A,
    #[serde(rename = "b", alias = "B")]
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Which game a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    ConnectFour,
    Rps,
}

impl std::str::FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tictactoe" | "tic_tac_toe" | "ttt" => Ok(GameKind::TicTacToe),
            "connect_four" | "connectfour" | "c4" => Ok(GameKind::ConnectFour),
            "rps" | "rock_paper_scissors" => Ok(GameKind::Rps),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// Match result relative to the local participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn for_side(winner: Option<Side>, local: Side) -> Self {
        match winner {
            Some(side) if side == local => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Draw,
        }
    }
}

/// A move as entered by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMove {
    /// Tic-tac-toe cell, 0..9
    Cell(usize),
    /// Connect-Four column, 0..7
    Column(usize),
    Throw(Choice),
}

/// Reasons a move is refused. Local rejections are absorbed by the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell or column {0} is out of range")]
    OutOfRange(usize),

    #[error("cell {0} is occupied")]
    Occupied(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("oldest mark must be evicted first")]
    DecayPending,

    #[error("choice already committed this round")]
    AlreadyCommitted,

    #[error("not this side's turn")]
    NotYourTurn,

    #[error("session is not playing")]
    NotPlaying,

    #[error("an animation is in progress")]
    Busy,

    #[error("local side is not assigned yet")]
    SideUnknown,

    #[error("move does not belong to this game")]
    WrongGame,
}

/// Authoritative snapshot that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("board has {got} cells, expected {expected}")]
    BoardLength { expected: usize, got: usize },
}

/// What the immediate part of a local move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Oldest mark faded out; `cell` is placed once the fade ends
    Evicted { evicted: usize, cell: usize },
    Placed { cell: usize },
    /// Token is falling; the board is decided once it settles
    Dropped { column: usize, row: usize },
    /// Throw is in, the other side's is not
    Committed,
    /// Both throws are in; the round is scored after the reveal pause
    Revealed {
        round: u32,
        side_a: Choice,
        side_b: Choice,
        winner: Option<Side>,
    },
}

/// Round wins after scoring an RPS round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTally {
    pub round: u32,
    pub wins_a: u32,
    pub wins_b: u32,
}

impl RoundTally {
    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.wins_a,
            Side::B => self.wins_b,
        }
    }
}

/// Per-game state, dispatched by game identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    TicTacToe(TicTacToe),
    ConnectFour(ConnectFour),
    Rps(RockPaperScissors),
}

impl GameState {
    pub fn new(kind: GameKind) -> Self {
        match kind {
            GameKind::TicTacToe => GameState::TicTacToe(TicTacToe::new()),
            GameKind::ConnectFour => GameState::ConnectFour(ConnectFour::new()),
            GameKind::Rps => GameState::Rps(RockPaperScissors::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameState::TicTacToe(_) => GameKind::TicTacToe,
            GameState::ConnectFour(_) => GameKind::ConnectFour,
            GameState::Rps(_) => GameKind::Rps,
        }
    }

    /// Whether the game alternates turns (RPS commits simultaneously)
    pub fn is_turn_based(&self) -> bool {
        !matches!(self, GameState::Rps(_))
    }

    /// Rule check for a move by `side`, without applying it
    pub fn check_local_move(&self, side: Side, mv: PlayerMove) -> Result<(), MoveError> {
        match (self, mv) {
            (GameState::TicTacToe(game), PlayerMove::Cell(cell)) => game.check_move(cell),
            (GameState::ConnectFour(game), PlayerMove::Column(column)) => {
                game.check_move(column).map(|_| ())
            }
            (GameState::Rps(game), PlayerMove::Throw(_)) => {
                if game.has_committed(side) {
                    Err(MoveError::AlreadyCommitted)
                } else {
                    Ok(())
                }
            }
            _ => Err(MoveError::WrongGame),
        }
    }

    /// Apply a move with local authority. Only the immediate part happens
    /// here; the caller paces the rest (decay fade, token settling, reveal)
    /// and then asks [`Self::check_terminal`].
    pub fn apply_local_move(&mut self, side: Side, mv: PlayerMove) -> Result<Applied, MoveError> {
        match (self, mv) {
            (GameState::TicTacToe(game), PlayerMove::Cell(cell)) => {
                game.check_move(cell)?;
                match game.evict_oldest(side) {
                    Some(evicted) => Ok(Applied::Evicted { evicted, cell }),
                    None => game.place(side, cell).map(|_| Applied::Placed { cell }),
                }
            }
            (GameState::ConnectFour(game), PlayerMove::Column(column)) => game
                .apply_move(side, column)
                .map(|landed| Applied::Dropped {
                    column,
                    row: landed.row,
                }),
            (GameState::Rps(game), PlayerMove::Throw(choice)) => {
                game.commit(side, choice)?;
                Ok(match game.committed_pair() {
                    Some((side_a, side_b)) => Applied::Revealed {
                        round: game.round(),
                        side_a,
                        side_b,
                        winner: rps::round_winner(side_a, side_b),
                    },
                    None => Applied::Committed,
                })
            }
            _ => Err(MoveError::WrongGame),
        }
    }

    /// Place the mark held back by [`Applied::Evicted`]
    pub fn complete_placement(&mut self, side: Side, cell: usize) -> Result<(), MoveError> {
        match self {
            GameState::TicTacToe(game) => game.place(side, cell).map(|_| ()),
            _ => Err(MoveError::WrongGame),
        }
    }

    /// Clear an exhausted Connect-Four board. Returns the next mover and the
    /// new round number, or `None` if play can go on.
    pub fn replay_if_exhausted(&mut self) -> Option<(Side, u32)> {
        match self {
            GameState::ConnectFour(game) if game.winner().is_none() && game.is_full() => {
                let next = game.reset_round();
                Some((next, game.round()))
            }
            _ => None,
        }
    }

    /// Overwrite the current RPS round with revealed throws. `false` for
    /// board games.
    pub fn reveal_round(&mut self, round: u32, side_a: Choice, side_b: Choice) -> bool {
        match self {
            GameState::Rps(game) => {
                game.reveal(round, side_a, side_b);
                true
            }
            _ => false,
        }
    }

    /// Credit the revealed round
    pub fn score_round(&mut self, winner: Option<Side>) -> Option<RoundTally> {
        let GameState::Rps(game) = self else {
            return None;
        };
        let round = game.round();
        game.score(winner);
        Some(RoundTally {
            round,
            wins_a: game.wins(Side::A),
            wins_b: game.wins(Side::B),
        })
    }

    /// Clear both throws and open the next round; returns its number
    pub fn next_round(&mut self) -> Option<u32> {
        let GameState::Rps(game) = self else {
            return None;
        };
        game.advance_round();
        Some(game.round())
    }

    /// `side` has committed this round and the other side has not
    pub fn awaiting_commit(&self, side: Side) -> bool {
        match self {
            GameState::Rps(game) => game.has_committed(side) && game.committed_pair().is_none(),
            _ => false,
        }
    }

    /// Replace the board with the server's. RPS carries no board.
    pub fn apply_authoritative_state(&mut self, state: &BoardState) -> Result<(), SnapshotError> {
        match self {
            GameState::TicTacToe(game) => game.replace_board(
                &state.board,
                state.moves_a.as_deref(),
                state.moves_b.as_deref(),
            ),
            GameState::ConnectFour(game) => game.replace_board(&state.board, state.round),
            GameState::Rps(_) => Ok(()),
        }
    }

    /// Winning side, if the position is decided
    pub fn check_terminal(&self) -> Option<Side> {
        match self {
            GameState::TicTacToe(game) => game.winner(),
            GameState::ConnectFour(game) => game.winner(),
            GameState::Rps(game) => game.winner(),
        }
    }

    pub fn as_tictactoe(&self) -> Option<&TicTacToe> {
        match self {
            GameState::TicTacToe(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_connect_four(&self) -> Option<&ConnectFour> {
        match self {
            GameState::ConnectFour(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_rps(&self) -> Option<&RockPaperScissors> {
        match self {
            GameState::Rps(game) => Some(game),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_wire_format() {
        assert_eq!(serde_json::to_string(&Side::A).unwrap(), "\"a\"");
        assert_eq!(serde_json::from_str::<Side>("\"B\"").unwrap(), Side::B);
    }

    #[test]
    fn outcome_is_relative_to_local_side() {
        assert_eq!(Outcome::for_side(Some(Side::B), Side::B), Outcome::Win);
        assert_eq!(Outcome::for_side(Some(Side::A), Side::B), Outcome::Loss);
        assert_eq!(Outcome::for_side(None, Side::A), Outcome::Draw);
    }

    #[test]
    fn moves_for_other_games_are_rejected() {
        let game = GameState::new(GameKind::ConnectFour);
        assert_eq!(
            game.check_local_move(Side::A, PlayerMove::Cell(0)),
            Err(MoveError::WrongGame)
        );
        assert!(game.check_local_move(Side::A, PlayerMove::Column(3)).is_ok());
    }

    #[test]
    fn decayed_move_places_after_completion() {
        let mut game = GameState::new(GameKind::TicTacToe);
        for (side, cell) in [
            (Side::A, 0),
            (Side::B, 3),
            (Side::A, 1),
            (Side::B, 4),
            (Side::A, 5),
            (Side::B, 8),
        ] {
            assert_eq!(
                game.apply_local_move(side, PlayerMove::Cell(cell)),
                Ok(Applied::Placed { cell })
            );
        }

        assert_eq!(
            game.apply_local_move(Side::A, PlayerMove::Cell(2)),
            Ok(Applied::Evicted { evicted: 0, cell: 2 })
        );
        assert_eq!(game.as_tictactoe().unwrap().cell(2), None);
        game.complete_placement(Side::A, 2).unwrap();
        assert_eq!(game.check_terminal(), None);

        game.apply_local_move(Side::B, PlayerMove::Cell(6)).unwrap();
        game.complete_placement(Side::B, 6).unwrap();
        game.apply_local_move(Side::A, PlayerMove::Cell(0)).unwrap();
        game.complete_placement(Side::A, 0).unwrap();
        // A now holds 5, 2, 0
        assert_eq!(game.check_terminal(), None);

        // B's 4 fades and 6-7-8 completes
        assert_eq!(
            game.apply_local_move(Side::B, PlayerMove::Cell(7)),
            Ok(Applied::Evicted { evicted: 4, cell: 7 })
        );
        game.complete_placement(Side::B, 7).unwrap();
        assert_eq!(game.check_terminal(), Some(Side::B));
    }

    #[test]
    fn rps_rounds_can_be_replayed_through_the_game_interface() {
        let mut game = GameState::new(GameKind::Rps);
        assert_eq!(
            game.apply_local_move(Side::A, PlayerMove::Throw(Choice::Rock)),
            Ok(Applied::Committed)
        );
        assert!(game.awaiting_commit(Side::A));
        assert_eq!(
            game.apply_local_move(Side::B, PlayerMove::Throw(Choice::Paper)),
            Ok(Applied::Revealed {
                round: 1,
                side_a: Choice::Rock,
                side_b: Choice::Paper,
                winner: Some(Side::B),
            })
        );
        // Still the same round until it is scored and advanced
        assert_eq!(
            game.apply_local_move(Side::A, PlayerMove::Throw(Choice::Rock)),
            Err(MoveError::AlreadyCommitted)
        );

        let tally = game.score_round(Some(Side::B)).unwrap();
        assert_eq!((tally.round, tally.wins(Side::B)), (1, 1));
        assert_eq!(game.next_round(), Some(2));
        assert_eq!(
            game.apply_local_move(Side::A, PlayerMove::Throw(Choice::Rock)),
            Ok(Applied::Committed)
        );
        assert_eq!(game.check_terminal(), None);
    }

    #[test]
    fn only_exhausted_connect_four_boards_replay() {
        let mut game = GameState::new(GameKind::ConnectFour);
        game.apply_local_move(Side::A, PlayerMove::Column(3)).unwrap();
        assert_eq!(game.replay_if_exhausted(), None);
        assert_eq!(GameState::new(GameKind::Rps).replay_if_exhausted(), None);
    }

    #[test]
    fn parses_game_kind() {
        assert_eq!("C4".parse::<GameKind>().unwrap(), GameKind::ConnectFour);
        assert!("chess".parse::<GameKind>().is_err());
    }
}
