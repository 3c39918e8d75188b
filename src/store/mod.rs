//! Reward and result persistence, Supabase-backed or in memory

pub mod ledger;
pub mod results;
pub mod supabase;

pub use ledger::{Balance, MemoryLedger, ProfileLedger, RewardLedger};
pub use results::{MatchResult, MemoryResults, ResultSink, SupabaseResults};
pub use supabase::{StoreError, SupabaseClient};
