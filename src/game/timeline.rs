//! Scheduled steps on the session's virtual clock
//!
//! Animation pacing (decay fade, token drop, reveal) and opponent thinking
//! are queued here instead of as timer callbacks, so a test can replay them
//! by advancing time.

use crate::util::time::Millis;

use super::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Second half of a decayed tic-tac-toe move
    PlaceMark { side: Side, cell: usize },
    /// Connect-Four token has finished falling
    SettleDrop { side: Side },
    /// Local opponent plays a board move
    OpponentMove,
    /// Local opponent commits its throw
    OpponentThrow,
    /// Reveal pause is over; credit the round
    ScoreRound { winner: Option<Side> },
    /// Result pause is over; start the next round
    AdvanceRound,
}

impl Step {
    /// Steps that gate input and hold the turn clock
    pub fn is_animation(&self) -> bool {
        !matches!(self, Step::OpponentMove | Step::OpponentThrow)
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Millis,
    seq: u64,
    step: Step,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    queue: Vec<Scheduled>,
    seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, step: Step) {
        self.seq += 1;
        self.queue.push(Scheduled {
            due,
            seq: self.seq,
            step,
        });
    }

    /// Earliest deadline
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.iter().map(|s| s.due).min()
    }

    /// Remove and return the earliest step due at or before `now`.
    /// Steps with equal deadlines come out in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, Step)> {
        let (idx, _) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.seq))?;
        let scheduled = self.queue.swap_remove(idx);
        Some((scheduled.due, scheduled.step))
    }

    pub fn gate_active(&self) -> bool {
        self.queue.iter().any(|s| s.step.is_animation())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
