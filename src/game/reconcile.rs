//! Reconciliation between local prediction and the authoritative server
//!
//! Tracks which side the local player sits on, whether a submitted move is
//! still unconfirmed, and holds back events that cannot be interpreted yet.
//! Held events are queued by the dependency they wait on and handed back in
//! arrival order once that dependency resolves.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::ws::protocol::{GameEnd, ServerMsg};

use super::{Outcome, Side};

/// Something a held event is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dependency {
    /// The `start` event naming the local side
    SideAssignment,
    /// The reveal sequence of the previous RPS round has finished
    RoundSettled,
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    local_address: String,
    local_side: Option<Side>,
    opponent: Option<String>,
    awaiting_confirmation: bool,
    pending: BTreeMap<Dependency, VecDeque<ServerMsg>>,
}

impl Reconciler {
    pub fn new(local_address: impl Into<String>) -> Self {
        Self {
            local_address: local_address.into(),
            local_side: None,
            opponent: None,
            awaiting_confirmation: false,
            pending: BTreeMap::new(),
        }
    }

    /// Already-known side, as in local play
    pub fn with_side(local_address: impl Into<String>, side: Side) -> Self {
        let mut reconciler = Self::new(local_address);
        reconciler.local_side = Some(side);
        reconciler
    }

    pub fn local_address(&self) -> &str {
        &self.local_address
    }

    pub fn local_side(&self) -> Option<Side> {
        self.local_side
    }

    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn set_opponent(&mut self, opponent: Option<String>) {
        if opponent.is_some() {
            self.opponent = opponent;
        }
    }

    /// Record the side assignment. Returns events that were waiting on it.
    pub fn assign_side(&mut self, side: Side) -> Vec<ServerMsg> {
        self.local_side = Some(side);
        self.release(Dependency::SideAssignment)
    }

    /// Whether interpreting `msg` requires the local side
    pub fn depends_on_side(msg: &ServerMsg) -> bool {
        match msg {
            ServerMsg::GameEnd(end) => end.needs_side(),
            ServerMsg::RpsReveal(_) => true,
            _ => false,
        }
    }

    /// Pass `msg` through if it can be interpreted now, otherwise hold it
    pub fn admit(&mut self, msg: ServerMsg) -> Option<ServerMsg> {
        if self.local_side.is_none() && Self::depends_on_side(&msg) {
            debug!(?msg, "Holding event until side assignment");
            self.defer(Dependency::SideAssignment, msg);
            return None;
        }
        Some(msg)
    }

    pub fn defer(&mut self, dependency: Dependency, msg: ServerMsg) {
        self.pending.entry(dependency).or_default().push_back(msg);
    }

    /// Take every event held on `dependency`, oldest first
    pub fn release(&mut self, dependency: Dependency) -> Vec<ServerMsg> {
        self.pending
            .remove(&dependency)
            .map(Vec::from)
            .unwrap_or_default()
    }

    pub fn pending_count(&self, dependency: Dependency) -> usize {
        self.pending.get(&dependency).map_or(0, VecDeque::len)
    }

    /// Local verdict for a terminal event, `None` while the side is unknown
    pub fn verdict(&self, end: &GameEnd) -> Option<Outcome> {
        if end.is_draw {
            return Some(Outcome::Draw);
        }
        if let (Some(winner), Some(local)) = (end.winner_side, self.local_side) {
            return Some(Outcome::for_side(Some(winner), local));
        }
        if let Some(identity) = &end.winner_identity {
            return Some(if identity.eq_ignore_ascii_case(&self.local_address) {
                Outcome::Win
            } else {
                Outcome::Loss
            });
        }
        if end.winner_side.is_some() {
            return None;
        }
        Some(Outcome::Draw)
    }

    /// A move was sent and the server has not answered with a state yet
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn mark_submitted(&mut self) {
        self.awaiting_confirmation = true;
    }

    pub fn confirm(&mut self) {
        self.awaiting_confirmation = false;
    }
}
