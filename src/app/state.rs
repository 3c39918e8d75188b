//! Application state shared by the session runtime

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::rewards::RewardDelta;
use crate::store::{
    Balance, MatchResult, MemoryLedger, MemoryResults, ProfileLedger, ResultSink, RewardLedger,
    StoreError, SupabaseClient, SupabaseResults,
};

/// XP a player starts with when no ledger has a record
pub const STARTING_XP: i64 = 1000;

/// Reward ledger chosen at startup
#[derive(Clone)]
pub enum Ledger {
    Profile(ProfileLedger),
    Memory(MemoryLedger),
}

impl RewardLedger for Ledger {
    async fn balance(&self) -> Result<Balance, StoreError> {
        match self {
            Ledger::Profile(ledger) => ledger.balance().await,
            Ledger::Memory(ledger) => ledger.balance().await,
        }
    }

    async fn apply(&self, delta: RewardDelta) -> Result<Balance, StoreError> {
        match self {
            Ledger::Profile(ledger) => ledger.apply(delta).await,
            Ledger::Memory(ledger) => ledger.apply(delta).await,
        }
    }
}

/// Result sink chosen at startup
#[derive(Clone)]
pub enum Results {
    Supabase(SupabaseResults),
    Memory(MemoryResults),
}

impl ResultSink for Results {
    async fn submit(&self, result: &MatchResult) -> Result<(), StoreError> {
        match self {
            Results::Supabase(sink) => sink.submit(result).await,
            Results::Memory(sink) => sink.submit(result).await,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<Ledger>,
    pub results: Arc<Results>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let (ledger, results) = match config.supabase() {
            Some((url, key)) => {
                let supabase = SupabaseClient::new(url, key);
                info!(url, "Using Supabase for rewards and results");
                (
                    Ledger::Profile(ProfileLedger::new(supabase.clone(), &config.player_address)),
                    Results::Supabase(SupabaseResults::new(supabase)),
                )
            }
            None => {
                info!("Supabase not configured; rewards stay in memory");
                (
                    Ledger::Memory(MemoryLedger::new(Balance {
                        xp: STARTING_XP,
                        ark: 0,
                    })),
                    Results::Memory(MemoryResults::new()),
                )
            }
        };

        Self {
            config,
            ledger: Arc::new(ledger),
            results: Arc::new(results),
        }
    }

    /// Local player's XP for the XP transfer, falling back to the default
    pub async fn local_xp(&self) -> i64 {
        match self.ledger.balance().await {
            Ok(balance) => balance.xp,
            Err(e) => {
                warn!(error = %e, "Could not read player balance; assuming starting XP");
                STARTING_XP
            }
        }
    }
}
