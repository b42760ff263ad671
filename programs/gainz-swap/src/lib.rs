//! Gainz Swap: deterministic pair registry, single-asset liquidity zap and
//! epoch-locked staking with pro-rata reward distribution.
//!
//! 4 write operations on [`Exchange`]:
//!   create_pair            register a pool at its derived address and seed it
//!   stake                  zap one payment into a pool and lock the liquidity
//!   update_reward_reserve  fund the reward reserve, spread over stake weight
//!   claim_rewards          pay accrued rewards; the position moves to a new nonce
//!
//! Every write runs atomically under its own reentrancy flag. Token balances,
//! pool pricing and the epoch source are collaborators behind traits; the
//! [`memory`] module provides in-process implementations.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod exchange;
pub mod guard;
pub mod instructions;
pub mod ledger;
pub mod memory;
pub mod registry;
pub mod rewards;
pub mod router;
pub mod state;

pub use collaborators::{AssetLedger, EpochClock, Journaled, PricingPools};
pub use config::ExchangeConfig;
pub use constants::*;
pub use error::{ExchangeError, Result};
pub use events::ExchangeEvent;
pub use exchange::{Exchange, MemoryExchange};
pub use ledger::StakePositionLedger;
pub use memory::{ManualClock, MemoryAssets, MemoryPools};
pub use registry::{derive_pool_address, sort_tokens, PairRegistry};
pub use rewards::{Claim, RewardAccountingEngine};
pub use state::*;
