//! Session runtime
//!
//! One task owns the [`MatchSession`] and feeds it local input, transport
//! events, one-second clock ticks and its own scheduled deadlines. Effects
//! the session emits are carried out here: outbound messages, notices for the
//! renderer, reward booking, result submission and transport release.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Pacing;
use crate::game::{
    Effect, LocalInput, MatchSession, Notice, Outcome, SessionPhase, Settlement, TransportStatus,
};
use crate::rewards::RewardDelta;
use crate::store::{Balance, ResultSink, RewardLedger};
use crate::util::time::{unix_millis, SessionClock};
use crate::ws::{Transport, TransportEvent};

const TICK: Duration = Duration::from_secs(1);

/// What a finished (or abandoned) session leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub match_id: Uuid,
    /// `None` when the session was torn down before a result
    pub outcome: Option<Outcome>,
    pub rewards: RewardDelta,
    /// Latest balance read back from the ledger
    pub balance: Option<Balance>,
}

pub struct SessionRuntime<L, R> {
    session: MatchSession,
    clock: SessionClock,
    input: mpsc::Receiver<LocalInput>,
    input_open: bool,
    transport: Option<Transport>,
    transport_events: Option<mpsc::Receiver<TransportEvent>>,
    notices: mpsc::UnboundedSender<Notice>,
    ledger: Arc<L>,
    results: Arc<R>,
    pacing: Pacing,
    settlement: Option<Settlement>,
}

impl<L, R> SessionRuntime<L, R>
where
    L: RewardLedger + 'static,
    R: ResultSink + 'static,
{
    pub fn new(
        session: MatchSession,
        clock: SessionClock,
        input: mpsc::Receiver<LocalInput>,
        notices: mpsc::UnboundedSender<Notice>,
        ledger: Arc<L>,
        results: Arc<R>,
        pacing: Pacing,
    ) -> Self {
        Self {
            session,
            clock,
            input,
            input_open: true,
            transport: None,
            transport_events: None,
            notices,
            ledger,
            results,
            pacing,
            settlement: None,
        }
    }

    /// Attach a connected transport and its event stream
    pub fn with_transport(
        mut self,
        transport: Transport,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        self.transport = Some(transport);
        self.transport_events = Some(events);
        self
    }

    /// Report a transport that never came up; the session plays on degraded
    pub fn transport_failed(mut self, error: impl ToString) -> Self {
        self.session
            .handle_transport(TransportStatus::Error(error.to_string()));
        self
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    /// Run until the match finishes
    pub async fn run(self) -> SessionReport {
        self.run_until(std::future::pending()).await
    }

    /// Run until the match finishes or `shutdown` resolves, whichever is first
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> SessionReport {
        tokio::pin!(shutdown);

        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(match_id = %self.session.match_id(), "Session runtime started");

        loop {
            self.flush();
            if self.session.phase() == SessionPhase::Finished {
                break;
            }

            let deadline = self
                .session
                .next_deadline()
                .map(|at| self.clock.instant_at(at));

            tokio::select! {
                input = self.input.recv(), if self.input_open => match input {
                    Some(input) => self.session.handle_input(input, self.clock.now()),
                    None => {
                        debug!("Input closed");
                        self.input_open = false;
                    }
                },
                event = next_event(&mut self.transport_events) => self.on_transport(event),
                _ = ticker.tick() => self.session.tick(self.clock.now()),
                _ = sleep_until_deadline(deadline) => self.session.advance(self.clock.now()),
                _ = &mut shutdown => {
                    info!(match_id = %self.session.match_id(), "Shutting down session");
                    self.session.teardown();
                    self.flush();
                    break;
                }
            }
        }

        self.settle().await
    }

    fn on_transport(&mut self, event: Option<TransportEvent>) {
        match event {
            Some(TransportEvent::Opened) => self.session.handle_transport(TransportStatus::Opened),
            Some(TransportEvent::Message(msg)) => {
                self.session
                    .handle_server(msg, self.clock.now(), unix_millis())
            }
            Some(TransportEvent::Error(error)) => {
                self.session.handle_transport(TransportStatus::Error(error));
                self.transport_events = None;
            }
            Some(TransportEvent::Closed) | None => {
                self.session.handle_transport(TransportStatus::Closed);
                self.transport_events = None;
            }
        }
    }

    /// Carry out every effect the session has queued
    fn flush(&mut self) {
        for effect in self.session.drain_effects() {
            match effect {
                Effect::Send(msg) => match &self.transport {
                    Some(transport) => {
                        if let Err(e) = transport.send(msg) {
                            warn!(error = %e, "Outbound message dropped");
                        }
                    }
                    None => debug!(?msg, "No transport; outbound message dropped"),
                },
                Effect::Notice(notice) => {
                    // Rendering is optional
                    let _ = self.notices.send(notice);
                }
                Effect::Settle(settlement) => self.settlement = Some(settlement),
                Effect::CloseTransport => {
                    if let Some(mut transport) = self.transport.take() {
                        transport.close();
                        info!(match_id = %self.session.match_id(), "Transport released");
                    }
                    self.transport_events = None;
                }
            }
        }
    }

    async fn settle(mut self) -> SessionReport {
        let match_id = self.session.match_id();
        let Some(settlement) = self.settlement.take() else {
            return SessionReport {
                match_id,
                outcome: None,
                rewards: RewardDelta::ZERO,
                balance: None,
            };
        };

        let submission = settlement.result.clone().map(|result| {
            let results = Arc::clone(&self.results);
            tokio::spawn(async move {
                match results.submit(&result).await {
                    Ok(()) => info!(match_id = %result.match_id, "Match result submitted"),
                    Err(e) => warn!(match_id = %result.match_id, error = %e, "Match result submission failed"),
                }
            })
        });

        let mut balance = None;
        if !settlement.rewards.is_zero() {
            match self.ledger.apply(settlement.rewards).await {
                Ok(booked) => balance = Some(booked),
                Err(e) => warn!(%match_id, error = %e, "Failed to book rewards"),
            }
        }

        if let Some(submission) = submission {
            let _ = submission.await;
        }

        if settlement.refresh_balance {
            balance = self.refresh_balance(balance).await.or(balance);
        }

        SessionReport {
            match_id,
            outcome: Some(settlement.outcome),
            rewards: settlement.rewards,
            balance,
        }
    }

    /// Poll the ledger a bounded number of times, stopping early once it
    /// shows the balance we booked
    async fn refresh_balance(&self, expected: Option<Balance>) -> Option<Balance> {
        let mut latest = None;
        for attempt in 1..=self.pacing.refresh_attempts {
            sleep(Duration::from_millis(self.pacing.refresh_spacing_ms)).await;
            match self.ledger.balance().await {
                Ok(balance) => {
                    debug!(attempt, xp = balance.xp, ark = balance.ark, "Balance refreshed");
                    latest = Some(balance);
                    if expected == Some(balance) {
                        break;
                    }
                }
                Err(e) => warn!(attempt, error = %e, "Balance refresh failed"),
            }
        }
        latest
    }
}

async fn next_event(events: &mut Option<mpsc::Receiver<TransportEvent>>) -> Option<TransportEvent> {
    match events {
        Some(events) => events.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
