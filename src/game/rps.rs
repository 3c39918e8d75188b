//! Rock-paper-scissors, first to five round wins

use serde::{Deserialize, Serialize};

use super::{MoveError, Side};

/// Round wins that end the match
pub const WINS_TO_END: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}

impl std::str::FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Choice::Rock),
            "paper" | "p" => Ok(Choice::Paper),
            "scissors" | "s" => Ok(Choice::Scissors),
            other => Err(format!("unknown choice: {other}")),
        }
    }
}

/// Winning side of a single round, `None` on a tie
pub fn round_winner(a: Choice, b: Choice) -> Option<Side> {
    if a.beats(b) {
        Some(Side::A)
    } else if b.beats(a) {
        Some(Side::B)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RockPaperScissors {
    round: u32,
    choice_a: Option<Choice>,
    choice_b: Option<Choice>,
    wins_a: u32,
    wins_b: u32,
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl RockPaperScissors {
    pub fn new() -> Self {
        Self {
            round: 1,
            choice_a: None,
            choice_b: None,
            wins_a: 0,
            wins_b: 0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn choice(&self, side: Side) -> Option<Choice> {
        match side {
            Side::A => self.choice_a,
            Side::B => self.choice_b,
        }
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.wins_a,
            Side::B => self.wins_b,
        }
    }

    pub fn has_committed(&self, side: Side) -> bool {
        self.choice(side).is_some()
    }

    pub fn commit(&mut self, side: Side, choice: Choice) -> Result<(), MoveError> {
        let slot = match side {
            Side::A => &mut self.choice_a,
            Side::B => &mut self.choice_b,
        };
        if slot.is_some() {
            return Err(MoveError::AlreadyCommitted);
        }
        *slot = Some(choice);
        Ok(())
    }

    /// Both choices, once both sides have committed
    pub fn committed_pair(&self) -> Option<(Choice, Choice)> {
        Some((self.choice_a?, self.choice_b?))
    }

    /// Overwrite the round with an authoritative reveal
    pub fn reveal(&mut self, round: u32, a: Choice, b: Choice) {
        self.round = round;
        self.choice_a = Some(a);
        self.choice_b = Some(b);
    }

    /// Credit a round and return the match winner if that crossed the line
    pub fn score(&mut self, winner: Option<Side>) -> Option<Side> {
        match winner {
            Some(Side::A) => self.wins_a += 1,
            Some(Side::B) => self.wins_b += 1,
            None => {}
        }
        self.winner()
    }

    pub fn winner(&self) -> Option<Side> {
        if self.wins_a >= WINS_TO_END {
            Some(Side::A)
        } else if self.wins_b >= WINS_TO_END {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Clear both choices and move to the next round
    pub fn advance_round(&mut self) {
        self.choice_a = None;
        self.choice_b = None;
        self.round += 1;
    }
}
