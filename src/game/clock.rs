//! Per-turn countdown

use super::Side;

/// Default seconds per turn
pub const TURN_BUDGET_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Not started yet, or the session is over
    Stopped,
    Running,
    /// Held while an animation or reveal is in flight
    Paused,
    Expired,
}

#[derive(Debug, Clone)]
pub struct TurnClock {
    owner: Side,
    remaining: u32,
    budget: u32,
    state: ClockState,
}

impl TurnClock {
    pub fn new(budget: u32) -> Self {
        Self {
            owner: Side::A,
            remaining: budget,
            budget,
            state: ClockState::Stopped,
        }
    }

    pub fn owner(&self) -> Side {
        self.owner
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Full budget for `owner`, running
    pub fn reset(&mut self, owner: Side) {
        self.resync(owner, self.budget);
    }

    /// Attach to `owner` with a server-derived remaining time
    pub fn resync(&mut self, owner: Side, remaining: u32) {
        if self.state == ClockState::Expired {
            return;
        }
        self.owner = owner;
        self.remaining = remaining.min(self.budget);
        self.state = ClockState::Running;
    }

    /// Hold or release the countdown. No effect on a stopped or expired clock.
    pub fn set_paused(&mut self, paused: bool) {
        self.state = match (self.state, paused) {
            (ClockState::Running, true) => ClockState::Paused,
            (ClockState::Paused, false) => ClockState::Running,
            (state, _) => state,
        };
    }

    pub fn stop(&mut self) {
        if self.state != ClockState::Expired {
            self.state = ClockState::Stopped;
        }
    }

    /// One elapsed second. A tick that finds the clock at zero expires it
    /// and returns the side that ran out of time.
    pub fn tick(&mut self) -> Option<Side> {
        if self.state != ClockState::Running {
            return None;
        }
        if self.remaining == 0 {
            self.state = ClockState::Expired;
            return Some(self.owner);
        }
        self.remaining -= 1;
        None
    }
}

impl Default for TurnClock {
    fn default() -> Self {
        Self::new(TURN_BUDGET_SECS)
    }
}
