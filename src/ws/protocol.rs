//! Transport message definitions
//! These are the wire types exchanged with the game server for one match

use serde::{Deserialize, Serialize};

use crate::game::{Choice, Side};

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Board move: a tic-tac-toe cell or a Connect-Four column
    Move {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<usize>,
    },

    /// Rock-paper-scissors commit
    Choice { choice: Choice },

    /// Concede the match
    Forfeit,
}

impl ClientMsg {
    pub fn cell(position: usize) -> Self {
        ClientMsg::Move {
            position: Some(position),
            column: None,
        }
    }

    pub fn column(column: usize) -> Self {
        ClientMsg::Move {
            position: None,
            column: Some(column),
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Side assignment for the local player
    Start(SideAssignment),

    /// Full authoritative board
    State(BoardState),

    /// The opponent's move, ahead of the next state
    OpponentMove {
        position: usize,
        #[serde(default)]
        timestamp: Option<i64>,
    },

    /// Match is over
    GameEnd(GameEnd),

    /// Both throws of an RPS round
    RpsReveal(RpsReveal),

    /// Error message
    Error {
        #[serde(default)]
        code: Option<String>,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideAssignment {
    pub side: Side,
    pub current_turn_owner: Side,
    /// Unix millis at which the current turn started
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    /// Opponent identity (wallet address)
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub opponent_xp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    /// Row-major cells; `null` for empty
    pub board: Vec<Option<Side>>,
    pub current_turn_owner: Side,
    /// Unix millis at which the server produced this state
    #[serde(default)]
    pub server_timestamp: Option<i64>,
    /// Connect-Four round counter
    #[serde(default)]
    pub round: Option<u32>,
    /// Tic-tac-toe placement order per side, oldest first
    #[serde(default)]
    pub moves_a: Option<Vec<usize>>,
    #[serde(default)]
    pub moves_b: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnd {
    #[serde(default)]
    pub winner_side: Option<Side>,
    /// Winner's identity, compared against the local address when no side is given
    #[serde(default)]
    pub winner_identity: Option<String>,
    #[serde(default)]
    pub is_draw: bool,
}

impl GameEnd {
    /// Whether turning this into a local verdict needs the local side
    pub fn needs_side(&self) -> bool {
        !self.is_draw && self.winner_side.is_some() && self.winner_identity.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsReveal {
    pub round: u32,
    pub side_a_choice: Choice,
    pub side_b_choice: Choice,
    /// `None` when the round was a tie
    #[serde(default)]
    pub winner_side: Option<Side>,
}
