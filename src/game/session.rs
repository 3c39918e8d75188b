//! Match session controller
//!
//! Owns the per-game state for one match and turns discrete events (local
//! input, one-second clock ticks, server messages, elapsed delays) into state
//! changes plus a queue of [`Effect`]s for the runtime to carry out. Every
//! handler takes the current virtual time, so the whole session is
//! deterministic under test.

use std::str::FromStr;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, Pacing};
use crate::rewards::{self, RewardDelta};
use crate::store::results::MatchResult;
use crate::util::time::{resync_remaining, Millis};
use crate::ws::protocol::{BoardState, ClientMsg, RpsReveal, ServerMsg, SideAssignment};

use super::clock::{ClockState, TurnClock};
use super::connect_four::STARTING_SIDE;
use super::{
    Applied, Choice, Dependency, GameKind, GameState, LocalOpponent, MoveError, OpponentPolicy,
    Outcome, PlayerMove, Reconciler, Side, Step, Timeline,
};

/// Seat of the local player in offline play
pub const LOCAL_SEAT: Side = Side::A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Against the local opponent; this client is the authority
    Local,
    /// Server-authoritative
    Multiplayer,
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "ai" | "offline" => Ok(SessionMode::Local),
            "multiplayer" | "online" | "mp" => Ok(SessionMode::Multiplayer),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Lifecycle phase; `Finished` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Playing,
    Finished,
}

/// Input from the local player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalInput {
    Move(PlayerMove),
    Forfeit,
}

/// Connection-level notifications from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportStatus {
    Opened,
    Closed,
    Error(String),
}

/// State changes for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SideAssigned { side: Side },
    TurnChanged { owner: Side, remaining: u32 },
    Clock { remaining: u32 },
    ClockExpired { side: Side },
    /// Oldest mark faded out by decay
    PieceRemoved { side: Side, cell: usize },
    PiecePlaced { side: Side, cell: usize },
    TokenDropped { side: Side, column: usize, row: usize },
    /// Full Connect-Four board without a line; replaying
    RoundReset { round: u32 },
    BoardReplaced,
    OpponentMoved { position: usize },
    ThrowCommitted { side: Side },
    ThrowsRevealed { round: u32, side_a: Choice, side_b: Choice },
    RoundScored {
        round: u32,
        result: Outcome,
        local_wins: u32,
        opponent_wins: u32,
    },
    RoundAdvanced { round: u32 },
    Finished { outcome: Outcome, rewards: RewardDelta },
}

/// Everything owed to the outside world once a match is decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: Outcome,
    pub rewards: RewardDelta,
    /// Record for the result store; multiplayer only
    pub result: Option<MatchResult>,
    /// Poll the ledger balance afterwards
    pub refresh_balance: bool,
}

/// Work for the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send(ClientMsg),
    Notice(Notice),
    Settle(Settlement),
    CloseTransport,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub match_id: Uuid,
    pub game: GameKind,
    pub mode: SessionMode,
    /// Local player identity (wallet address)
    pub local_address: String,
    /// ARK stake; `None` is free play
    pub stake: Option<u64>,
    pub local_xp: i64,
    pub opponent_xp: i64,
    pub turn_seconds: u32,
    pub pacing: Pacing,
    pub opponent: OpponentPolicy,
}

impl SessionSettings {
    pub fn local(game: GameKind) -> Self {
        Self {
            match_id: Uuid::new_v4(),
            game,
            mode: SessionMode::Local,
            local_address: "local-player".to_string(),
            stake: None,
            local_xp: 0,
            opponent_xp: 0,
            turn_seconds: super::clock::TURN_BUDGET_SECS,
            pacing: Pacing::default(),
            opponent: OpponentPolicy::default(),
        }
    }

    pub fn multiplayer(game: GameKind, match_id: Uuid, local_address: impl Into<String>) -> Self {
        Self {
            match_id,
            mode: SessionMode::Multiplayer,
            local_address: local_address.into(),
            ..Self::local(game)
        }
    }

    pub fn from_config(config: &Config, local_xp: i64) -> Self {
        Self {
            match_id: config.match_id,
            game: config.game,
            mode: config.mode,
            local_address: config.player_address.clone(),
            stake: config.stake,
            local_xp,
            opponent_xp: config.opponent_xp,
            turn_seconds: config.turn_seconds,
            pacing: config.pacing,
            opponent: match config.ai_seed {
                Some(seed) => OpponentPolicy::Random { seed },
                None => OpponentPolicy::default(),
            },
        }
    }
}

pub struct MatchSession {
    match_id: Uuid,
    mode: SessionMode,
    phase: SessionPhase,
    game: GameState,
    turn: Side,
    clock: TurnClock,
    timeline: Timeline,
    reconciler: Reconciler,
    opponent: Option<LocalOpponent>,
    stake: Option<u64>,
    local_xp: i64,
    opponent_xp: i64,
    pacing: Pacing,
    started_at: Millis,
    now: Millis,
    last_wall: i64,
    outcome: Option<(Outcome, RewardDelta)>,
    transport_released: bool,
    degraded: bool,
    effects: Vec<Effect>,
}

impl MatchSession {
    pub fn new(settings: SessionSettings, now: Millis) -> Self {
        let (reconciler, opponent) = match settings.mode {
            SessionMode::Local => (
                Reconciler::with_side(settings.local_address, LOCAL_SEAT),
                Some(LocalOpponent::new(LOCAL_SEAT.opponent(), settings.opponent)),
            ),
            SessionMode::Multiplayer => (Reconciler::new(settings.local_address), None),
        };

        let mut session = Self {
            match_id: settings.match_id,
            mode: settings.mode,
            phase: SessionPhase::Playing,
            game: GameState::new(settings.game),
            turn: STARTING_SIDE,
            clock: TurnClock::new(settings.turn_seconds),
            timeline: Timeline::new(),
            reconciler,
            opponent,
            stake: settings.stake,
            local_xp: settings.local_xp,
            opponent_xp: settings.opponent_xp,
            pacing: settings.pacing,
            started_at: now,
            now,
            last_wall: 0,
            outcome: None,
            transport_released: false,
            degraded: false,
            effects: Vec::new(),
        };

        info!(
            match_id = %session.match_id,
            game = ?settings.game,
            mode = ?session.mode,
            stake = ?session.stake,
            "Session started"
        );

        // Offline the first turn starts at once; online it waits for `start`.
        if session.mode == SessionMode::Local {
            session.change_turn(STARTING_SIDE);
        }
        session
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Side whose move it is as perceived locally
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn local_side(&self) -> Option<Side> {
        self.reconciler.local_side()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.map(|(outcome, _)| outcome)
    }

    pub fn rewards(&self) -> Option<RewardDelta> {
        self.outcome.map(|(_, rewards)| rewards)
    }

    /// Transport is down; play continues without server confirmation
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// An animation or reveal is holding input and the clock
    pub fn is_gated(&self) -> bool {
        self.timeline.gate_active()
    }

    /// Next virtual time at which [`Self::advance`] has work to do
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timeline.next_due()
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // Event handlers
    // ------------------------------------------------------------------

    /// Run every scheduled step due by `now`
    pub fn advance(&mut self, now: Millis) {
        while self.phase == SessionPhase::Playing {
            let Some((due, step)) = self.timeline.pop_due(now) else {
                break;
            };
            self.now = self.now.max(due);
            self.run_step(step);
        }
        self.now = self.now.max(now);
        self.sync_clock_pause();
    }

    pub fn handle_input(&mut self, input: LocalInput, now: Millis) {
        self.advance(now);
        if self.phase == SessionPhase::Finished {
            debug!(match_id = %self.match_id, ?input, "Ignoring input after finish");
            return;
        }

        match input {
            LocalInput::Forfeit => self.forfeit(),
            LocalInput::Move(mv) => {
                if let Err(reason) = self.try_local_move(mv) {
                    debug!(match_id = %self.match_id, ?mv, %reason, "Local move rejected");
                }
            }
        }
        self.sync_clock_pause();
    }

    /// One elapsed second on the turn clock
    pub fn tick(&mut self, now: Millis) {
        self.advance(now);
        if self.phase == SessionPhase::Finished {
            return;
        }

        if let Some(clocked) = self.clock.tick() {
            info!(match_id = %self.match_id, side = ?clocked, "Turn clock expired");
            self.notice(Notice::ClockExpired { side: clocked });
            self.finish_for(clocked.opponent());
        } else if self.clock.state() == ClockState::Running {
            self.notice(Notice::Clock {
                remaining: self.clock.remaining(),
            });
        }
    }

    /// Authoritative event from the server. `wall` is the local Unix time in
    /// milliseconds, used to resync the turn clock against server timestamps.
    pub fn handle_server(&mut self, msg: ServerMsg, now: Millis, wall: i64) {
        self.advance(now);
        self.last_wall = wall;

        if self.phase == SessionPhase::Finished {
            debug!(match_id = %self.match_id, ?msg, "Ignoring server event after finish");
            return;
        }
        if self.mode == SessionMode::Local {
            debug!(match_id = %self.match_id, ?msg, "Ignoring server event in local mode");
            return;
        }

        match msg {
            ServerMsg::Start(assignment) => self.on_start(assignment),
            other => {
                if let Some(msg) = self.reconciler.admit(other) {
                    self.apply_server(msg);
                }
            }
        }
        self.sync_clock_pause();
    }

    pub fn handle_transport(&mut self, status: TransportStatus) {
        match status {
            TransportStatus::Opened => {
                info!(match_id = %self.match_id, "Transport connected");
                self.degraded = false;
            }
            TransportStatus::Closed => {
                if self.phase == SessionPhase::Playing {
                    warn!(match_id = %self.match_id, "Transport closed mid-match; continuing unconfirmed");
                    self.degraded = true;
                }
            }
            TransportStatus::Error(error) => {
                warn!(match_id = %self.match_id, %error, "Transport error; continuing unconfirmed");
                self.degraded = true;
            }
        }
    }

    /// Component teardown: release the transport if the match did not already
    pub fn teardown(&mut self) {
        self.release_transport();
    }

    // ------------------------------------------------------------------
    // Local moves
    // ------------------------------------------------------------------

    fn try_local_move(&mut self, mv: PlayerMove) -> Result<(), MoveError> {
        if self.phase != SessionPhase::Playing {
            return Err(MoveError::NotPlaying);
        }
        if self.timeline.gate_active() {
            return Err(MoveError::Busy);
        }
        let side = self.reconciler.local_side().ok_or(MoveError::SideUnknown)?;
        if self.game.is_turn_based() && self.turn != side {
            return Err(MoveError::NotYourTurn);
        }
        self.game.check_local_move(side, mv)?;

        match self.mode {
            SessionMode::Local => self.play(side, mv),
            SessionMode::Multiplayer => {
                self.submit(side, mv);
                Ok(())
            }
        }
    }

    /// Send a move to the server. The board waits for the next `state`; only
    /// the perceived turn flips so the same move cannot be sent twice.
    fn submit(&mut self, side: Side, mv: PlayerMove) {
        let msg = match mv {
            PlayerMove::Cell(cell) => ClientMsg::cell(cell),
            PlayerMove::Column(column) => ClientMsg::column(column),
            PlayerMove::Throw(choice) => ClientMsg::Choice { choice },
        };
        debug!(match_id = %self.match_id, ?msg, "Submitting move");
        self.effects.push(Effect::Send(msg));
        self.reconciler.mark_submitted();

        match mv {
            PlayerMove::Throw(_) => {
                // Held locally so a second throw this round is refused
                if let Err(error) = self.game.apply_local_move(side, mv) {
                    debug!(match_id = %self.match_id, %error, "Throw not recorded locally");
                }
                self.notice(Notice::ThrowCommitted { side });
            }
            _ => self.change_turn(side.opponent()),
        }
    }

    /// Apply a move with local authority and pace whatever follows it
    fn play(&mut self, side: Side, mv: PlayerMove) -> Result<(), MoveError> {
        match self.game.apply_local_move(side, mv)? {
            Applied::Evicted { evicted, cell } => {
                self.notice(Notice::PieceRemoved {
                    side,
                    cell: evicted,
                });
                self.timeline.schedule(
                    self.now + self.pacing.decay_fade_ms,
                    Step::PlaceMark { side, cell },
                );
            }
            Applied::Placed { cell } => self.mark_placed(side, cell),
            Applied::Dropped { column, row } => {
                self.notice(Notice::TokenDropped { side, column, row });
                self.timeline
                    .schedule(self.now + self.pacing.token_drop_ms, Step::SettleDrop { side });
            }
            Applied::Committed => {
                self.notice(Notice::ThrowCommitted { side });
                if self.opponent.as_ref().is_some_and(|ai| ai.side() != side) {
                    self.timeline
                        .schedule(self.now + self.pacing.rps_commit_ms, Step::OpponentThrow);
                }
            }
            Applied::Revealed {
                round,
                side_a,
                side_b,
                winner,
            } => {
                self.notice(Notice::ThrowCommitted { side });
                self.begin_reveal(round, side_a, side_b, winner);
            }
        }
        Ok(())
    }

    fn mark_placed(&mut self, side: Side, cell: usize) {
        self.notice(Notice::PiecePlaced { side, cell });
        match self.game.check_terminal() {
            Some(winner) => self.finish_for(winner),
            None => self.change_turn(side.opponent()),
        }
    }

    fn settle_drop(&mut self, side: Side) {
        if let Some(winner) = self.game.check_terminal() {
            self.finish_for(winner);
        } else if let Some((next, round)) = self.game.replay_if_exhausted() {
            info!(match_id = %self.match_id, round, "Board full without a line; replaying round");
            self.notice(Notice::RoundReset { round });
            self.change_turn(next);
        } else {
            self.change_turn(side.opponent());
        }
    }

    fn begin_reveal(&mut self, round: u32, side_a: Choice, side_b: Choice, winner: Option<Side>) {
        self.notice(Notice::ThrowsRevealed {
            round,
            side_a,
            side_b,
        });
        self.timeline.schedule(
            self.now + self.pacing.rps_reveal_ms,
            Step::ScoreRound { winner },
        );
    }

    // ------------------------------------------------------------------
    // Scheduled steps
    // ------------------------------------------------------------------

    fn run_step(&mut self, step: Step) {
        match step {
            Step::PlaceMark { side, cell } => match self.game.complete_placement(side, cell) {
                Ok(()) => self.mark_placed(side, cell),
                Err(error) => warn!(match_id = %self.match_id, %error, "Decayed placement failed"),
            },
            Step::SettleDrop { side } => self.settle_drop(side),
            Step::OpponentMove | Step::OpponentThrow => self.opponent_turn(),
            Step::ScoreRound { winner } => self.score_round(winner),
            Step::AdvanceRound => self.advance_round(),
        }
    }

    fn opponent_turn(&mut self) {
        let Some(ai) = self.opponent.as_mut() else {
            return;
        };
        let side = ai.side();
        if self.game.is_turn_based() && self.turn != side {
            return;
        }
        let Some(mv) = ai.choose(&self.game) else {
            warn!(match_id = %self.match_id, "Local opponent has no legal move");
            return;
        };
        debug!(match_id = %self.match_id, ?mv, "Local opponent moves");
        if let Err(error) = self.play(side, mv) {
            warn!(match_id = %self.match_id, %error, "Local opponent move rejected");
        }
    }

    fn score_round(&mut self, winner: Option<Side>) {
        let Some(local) = self.reconciler.local_side() else {
            return;
        };
        let Some(tally) = self.game.score_round(winner) else {
            return;
        };
        self.notice(Notice::RoundScored {
            round: tally.round,
            result: Outcome::for_side(winner, local),
            local_wins: tally.wins(local),
            opponent_wins: tally.wins(local.opponent()),
        });

        match self.game.check_terminal() {
            Some(champion) => self.finish_for(champion),
            None => self
                .timeline
                .schedule(self.now + self.pacing.rps_result_ms, Step::AdvanceRound),
        }
    }

    fn advance_round(&mut self) {
        let Some(round) = self.game.next_round() else {
            return;
        };
        self.notice(Notice::RoundAdvanced { round });
        self.reconciler.confirm();
        self.change_turn(self.turn);

        for msg in self.reconciler.release(Dependency::RoundSettled) {
            if self.phase != SessionPhase::Playing {
                break;
            }
            self.apply_server(msg);
        }
    }

    // ------------------------------------------------------------------
    // Server events
    // ------------------------------------------------------------------

    fn on_start(&mut self, assignment: SideAssignment) {
        info!(
            match_id = %self.match_id,
            side = ?assignment.side,
            turn = ?assignment.current_turn_owner,
            "Side assigned"
        );
        self.reconciler.set_opponent(assignment.opponent);
        if let Some(xp) = assignment.opponent_xp {
            self.opponent_xp = xp;
        }
        self.reconciler.confirm();
        let held = self.reconciler.assign_side(assignment.side);
        self.notice(Notice::SideAssigned {
            side: assignment.side,
        });

        self.turn = assignment.current_turn_owner;
        let remaining = resync_remaining(
            self.clock.budget(),
            assignment.start_timestamp,
            self.last_wall,
        );
        self.clock.resync(self.clock_owner(), remaining);
        self.notice(Notice::TurnChanged {
            owner: self.turn,
            remaining,
        });

        // Anything that arrived before we knew our side gets its verdict now.
        for msg in held {
            if self.phase != SessionPhase::Playing {
                break;
            }
            self.apply_server(msg);
        }
    }

    fn apply_server(&mut self, msg: ServerMsg) {
        match msg {
            ServerMsg::Start(assignment) => self.on_start(assignment),
            ServerMsg::State(state) => self.apply_state(state),
            ServerMsg::OpponentMove { position, .. } => {
                self.notice(Notice::OpponentMoved { position });
            }
            ServerMsg::GameEnd(end) => match self.reconciler.verdict(&end) {
                Some(outcome) => self.finish(outcome),
                None => self
                    .reconciler
                    .defer(Dependency::SideAssignment, ServerMsg::GameEnd(end)),
            },
            ServerMsg::RpsReveal(reveal) => self.apply_reveal(reveal),
            ServerMsg::Error { code, message } => {
                warn!(match_id = %self.match_id, ?code, %message, "Server error");
            }
        }
    }

    fn apply_state(&mut self, state: BoardState) {
        if let Err(error) = self.game.apply_authoritative_state(&state) {
            warn!(match_id = %self.match_id, %error, "Ignoring malformed state");
            return;
        }
        self.reconciler.confirm();
        self.turn = state.current_turn_owner;
        self.notice(Notice::BoardReplaced);

        if self.reconciler.local_side().is_some() {
            let remaining =
                resync_remaining(self.clock.budget(), state.server_timestamp, self.last_wall);
            debug!(match_id = %self.match_id, remaining, "Clock resynced");
            self.clock.resync(self.clock_owner(), remaining);
        }
        self.notice(Notice::TurnChanged {
            owner: self.turn,
            remaining: self.clock.remaining(),
        });
    }

    fn apply_reveal(&mut self, reveal: RpsReveal) {
        if self.timeline.gate_active() {
            debug!(match_id = %self.match_id, round = reveal.round, "Holding reveal until current round settles");
            self.reconciler
                .defer(Dependency::RoundSettled, ServerMsg::RpsReveal(reveal));
            return;
        }
        if !self
            .game
            .reveal_round(reveal.round, reveal.side_a_choice, reveal.side_b_choice)
        {
            warn!(match_id = %self.match_id, "Reveal received for a board game");
            return;
        }
        self.reconciler.confirm();
        self.begin_reveal(
            reveal.round,
            reveal.side_a_choice,
            reveal.side_b_choice,
            reveal.winner_side,
        );
    }

    // ------------------------------------------------------------------
    // Turn, clock and settlement
    // ------------------------------------------------------------------

    /// Side the turn clock runs against. RPS commits are simultaneous, so
    /// there it is always the local player.
    fn clock_owner(&self) -> Side {
        match self.reconciler.local_side() {
            Some(local) if !self.game.is_turn_based() => local,
            _ => self.turn,
        }
    }

    fn change_turn(&mut self, next: Side) {
        self.turn = next;
        self.clock.reset(self.clock_owner());
        self.notice(Notice::TurnChanged {
            owner: next,
            remaining: self.clock.remaining(),
        });

        let ai_moves = self.game.is_turn_based()
            && self.opponent.as_ref().is_some_and(|ai| ai.side() == next);
        if ai_moves {
            self.timeline
                .schedule(self.now + self.pacing.ai_think_ms, Step::OpponentMove);
        }
    }

    /// Local throw is in and the opponent's is not
    fn awaiting_opponent_throw(&self) -> bool {
        self.reconciler
            .local_side()
            .is_some_and(|local| self.game.awaiting_commit(local))
    }

    fn sync_clock_pause(&mut self) {
        let hold = self.timeline.gate_active() || self.awaiting_opponent_throw();
        self.clock.set_paused(hold);
    }

    fn forfeit(&mut self) {
        info!(match_id = %self.match_id, "Local player forfeits");
        if self.mode == SessionMode::Multiplayer {
            self.effects.push(Effect::Send(ClientMsg::Forfeit));
        }
        self.finish(Outcome::Loss);
    }

    fn finish_for(&mut self, winner: Side) {
        match self.reconciler.local_side() {
            Some(local) => self.finish(Outcome::for_side(Some(winner), local)),
            None => warn!(match_id = %self.match_id, ?winner, "Winner known before local side"),
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.phase == SessionPhase::Finished {
            return;
        }
        self.phase = SessionPhase::Finished;
        self.timeline.clear();
        self.clock.stop();

        // Without the server nothing decided here is authoritative, so an
        // unconfirmed multiplayer finish books nothing and records nothing.
        let confirmed = self.mode == SessionMode::Local || !self.degraded;
        let rewards = if confirmed {
            rewards::settle(outcome, self.stake, self.local_xp, self.opponent_xp)
        } else {
            warn!(match_id = %self.match_id, ?outcome, "Match decided without the server; nothing booked");
            RewardDelta::ZERO
        };
        let duration_secs = u32::try_from(self.now.saturating_sub(self.started_at) / 1000)
            .unwrap_or(u32::MAX);
        let online = self.mode == SessionMode::Multiplayer && confirmed;
        let result = online.then(|| {
            MatchResult::new(
                self.match_id,
                self.reconciler.local_address(),
                self.reconciler.opponent(),
                outcome,
                duration_secs,
            )
        });
        self.outcome = Some((outcome, rewards));

        info!(
            match_id = %self.match_id,
            ?outcome,
            xp_delta = rewards.xp,
            ark_delta = rewards.ark,
            duration_secs,
            "Match finished"
        );

        self.notice(Notice::Finished { outcome, rewards });
        self.effects.push(Effect::Settle(Settlement {
            outcome,
            rewards,
            result,
            refresh_balance: online,
        }));
        self.release_transport();
    }

    fn release_transport(&mut self) {
        if self.mode == SessionMode::Multiplayer && !self.transport_released {
            self.transport_released = true;
            self.effects.push(Effect::CloseTransport);
        }
    }

    fn notice(&mut self, notice: Notice) {
        self.effects.push(Effect::Notice(notice));
    }
}
