//! Match result submission

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::Outcome;

use super::supabase::{StoreError, SupabaseClient};

/// Row recorded once a multiplayer match is decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: Uuid,
    /// `None` for draws, or when the opponent is unknown
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub outcome: Outcome,
    pub duration_secs: u32,
}

impl MatchResult {
    pub fn new(
        match_id: Uuid,
        local: &str,
        opponent: Option<&str>,
        outcome: Outcome,
        duration_secs: u32,
    ) -> Self {
        let local = Some(local.to_string());
        let opponent = opponent.map(str::to_string);
        let (winner, loser) = match outcome {
            Outcome::Win => (local, opponent),
            Outcome::Loss => (opponent, local),
            Outcome::Draw => (None, None),
        };
        Self {
            match_id,
            winner,
            loser,
            outcome,
            duration_secs,
        }
    }
}

/// Destination for finished match results
pub trait ResultSink: Send + Sync {
    fn submit(&self, result: &MatchResult) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Results table in Supabase
#[derive(Clone)]
pub struct SupabaseResults {
    client: SupabaseClient,
}

impl SupabaseResults {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ResultSink for SupabaseResults {
    async fn submit(&self, result: &MatchResult) -> Result<(), StoreError> {
        self.client.insert("match_results", result).await
    }
}

/// Keeps results in memory; used offline and in tests
#[derive(Clone, Default)]
pub struct MemoryResults {
    submitted: Arc<Mutex<Vec<MatchResult>>>,
}

impl MemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<MatchResult> {
        self.submitted.lock().clone()
    }
}

impl ResultSink for MemoryResults {
    async fn submit(&self, result: &MatchResult) -> Result<(), StoreError> {
        self.submitted.lock().push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_and_loser_follow_outcome() {
        let id = Uuid::new_v4();
        let won = MatchResult::new(id, "0xme", Some("0xthem"), Outcome::Win, 42);
        assert_eq!(won.winner.as_deref(), Some("0xme"));
        assert_eq!(won.loser.as_deref(), Some("0xthem"));

        let lost = MatchResult::new(id, "0xme", Some("0xthem"), Outcome::Loss, 42);
        assert_eq!(lost.winner.as_deref(), Some("0xthem"));
        assert_eq!(lost.loser.as_deref(), Some("0xme"));
    }

    #[test]
    fn draw_names_nobody() {
        let drawn = MatchResult::new(Uuid::new_v4(), "0xme", Some("0xthem"), Outcome::Draw, 5);
        assert_eq!(drawn.winner, None);
        assert_eq!(drawn.loser, None);
    }

    #[test]
    fn serializes_outcome_lowercase() {
        let result = MatchResult::new(Uuid::nil(), "0xme", None, Outcome::Win, 1);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "win");
        assert_eq!(json["loser"], serde_json::Value::Null);
    }
}
