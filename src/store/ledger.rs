//! Player XP and ARK balance

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rewards::RewardDelta;

use super::supabase::{StoreError, SupabaseClient};

/// XP and ARK held by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub xp: i64,
    #[serde(rename = "ark_balance")]
    pub ark: i64,
}

impl Balance {
    pub fn credited(self, delta: RewardDelta) -> Self {
        Self {
            xp: self.xp.saturating_add(delta.xp),
            ark: self.ark.saturating_add(delta.ark),
        }
    }
}

/// Where reward deltas are booked
pub trait RewardLedger: Send + Sync {
    /// Current balance as the ledger sees it
    fn balance(&self) -> impl Future<Output = Result<Balance, StoreError>> + Send;

    /// Book a delta; returns the new balance
    fn apply(&self, delta: RewardDelta) -> impl Future<Output = Result<Balance, StoreError>> + Send;
}

/// Partial update of a profile row
#[derive(Debug, Clone, Serialize)]
struct BalanceUpdate {
    xp: i64,
    ark_balance: i64,
}

/// The `profiles` table, keyed by wallet address
#[derive(Clone)]
pub struct ProfileLedger {
    client: SupabaseClient,
    address: String,
}

impl ProfileLedger {
    pub fn new(client: SupabaseClient, address: impl Into<String>) -> Self {
        Self {
            client,
            address: address.into(),
        }
    }

    fn query(&self) -> String {
        format!("address=eq.{}", self.address.to_lowercase())
    }
}

impl RewardLedger for ProfileLedger {
    async fn balance(&self) -> Result<Balance, StoreError> {
        let query = format!("{}&select=xp,ark_balance", self.query());
        let balance: Balance = self
            .client
            .get_one("profiles", &query)
            .await?
            .ok_or_else(|| StoreError::UnknownPlayer(self.address.clone()))?;
        Ok(balance)
    }

    async fn apply(&self, delta: RewardDelta) -> Result<Balance, StoreError> {
        let next = self.balance().await?.credited(delta);
        let update = BalanceUpdate {
            xp: next.xp,
            ark_balance: next.ark,
        };
        self.client.update("profiles", &self.query(), &update).await?;
        debug!(address = %self.address, xp = next.xp, ark = next.ark, "Profile balance updated");
        Ok(next)
    }
}

/// In-process ledger for offline play and tests
#[derive(Clone, Default)]
pub struct MemoryLedger {
    balance: Arc<Mutex<Balance>>,
    applied: Arc<Mutex<Vec<RewardDelta>>>,
}

impl MemoryLedger {
    pub fn new(balance: Balance) -> Self {
        Self {
            balance: Arc::new(Mutex::new(balance)),
            applied: Arc::default(),
        }
    }

    /// Every delta booked so far, in order
    pub fn applied(&self) -> Vec<RewardDelta> {
        self.applied.lock().clone()
    }
}

impl RewardLedger for MemoryLedger {
    async fn balance(&self) -> Result<Balance, StoreError> {
        Ok(*self.balance.lock())
    }

    async fn apply(&self, delta: RewardDelta) -> Result<Balance, StoreError> {
        self.applied.lock().push(delta);
        let mut balance = self.balance.lock();
        *balance = balance.credited(delta);
        Ok(*balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_shape() {
        let balance: Balance =
            serde_json::from_str(r#"{"xp": 1200, "ark_balance": 35}"#).unwrap();
        assert_eq!(balance, Balance { xp: 1200, ark: 35 });
    }

    #[tokio::test]
    async fn memory_ledger_books_deltas() {
        let ledger = MemoryLedger::new(Balance { xp: 1000, ark: 50 });
        let after = ledger
            .apply(RewardDelta { xp: 8, ark: -10 })
            .await
            .unwrap();
        assert_eq!(after, Balance { xp: 1008, ark: 40 });
        assert_eq!(ledger.balance().await.unwrap(), after);
        assert_eq!(ledger.applied().len(), 1);
    }
}
