//! [`Exchange`]: the entry point integrations drive.
//!
//! Each mutating method runs under its reentrancy flag inside one atomic
//! scope: the core state is snapshotted and every collaborator checkpointed
//! on entry, and all of it is restored if the handler fails.

use ethnum::U256;
use solana_sdk::pubkey::Pubkey;
use tracing::warn;

use crate::{
    collaborators::{AssetLedger, EpochClock, Journaled, PricingPools},
    config::ExchangeConfig,
    error::Result,
    events::ExchangeEvent,
    guard::{Entry, EntryGuards},
    instructions::{claim_rewards, create_pair, stake, update_reward_reserve},
    memory::{ManualClock, MemoryAssets, MemoryPools},
    registry::PairRegistry,
    rewards::{Claim, RewardAccountingEngine},
    state::{Pool, StakePosition, TokenPayment},
};

/// State the exchange owns outright. Cloned as the rollback snapshot.
#[derive(Debug, Clone)]
pub(crate) struct ExchangeCore {
    pub(crate) registry: PairRegistry,
    pub(crate) rewards: RewardAccountingEngine,
    pub(crate) events: Vec<ExchangeEvent>,
}

pub struct Exchange<A, P, C> {
    pub(crate) config: ExchangeConfig,
    pub(crate) core: ExchangeCore,
    pub(crate) guards: EntryGuards,
    pub(crate) assets: A,
    pub(crate) pools: P,
    pub(crate) clock: C,
}

/// Exchange wired to the in-memory collaborators.
pub type MemoryExchange = Exchange<MemoryAssets, MemoryPools, ManualClock>;

impl MemoryExchange {
    pub fn in_memory(config: ExchangeConfig) -> Result<Self> {
        Exchange::new(config, MemoryAssets::new(), MemoryPools::new(), ManualClock::default())
    }
}

impl<A, P, C> Exchange<A, P, C>
where
    A: AssetLedger,
    P: PricingPools,
    C: EpochClock,
{
    pub fn new(config: ExchangeConfig, assets: A, pools: P, clock: C) -> Result<Self> {
        config.validate()?;
        let core = ExchangeCore {
            registry: PairRegistry::new(config.registry_id, config.pool_implementation),
            rewards: RewardAccountingEngine::new(config.min_epochs_locked, config.max_epochs_locked),
            events: Vec::new(),
        };
        Ok(Self {
            config,
            core,
            guards: EntryGuards::default(),
            assets,
            pools,
            clock,
        })
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Create the pool for a token pair and seed it with both payments; LP
    /// goes to `caller`. Fails with `PairExists` for a known pair in either
    /// order, moving nothing.
    pub fn create_pair(
        &mut self,
        caller: &Pubkey,
        payment_a: TokenPayment,
        payment_b: TokenPayment,
        native_value: u128,
    ) -> Result<Pool> {
        self.atomic(Entry::CreatePair, |ex| {
            create_pair::handler(ex, caller, payment_a, payment_b, native_value)
        })
    }

    /// Zap one payment into a pool along `routing_paths` and lock the
    /// resulting liquidity for `epochs_locked`. Returns the position nonce.
    #[allow(clippy::too_many_arguments)]
    pub fn stake(
        &mut self,
        caller: &Pubkey,
        payment: TokenPayment,
        epochs_locked: u64,
        routing_paths: &[Vec<Pubkey>],
        min_liquidity_a: u128,
        min_liquidity_b: u128,
        native_value: u128,
    ) -> Result<u64> {
        self.atomic(Entry::Stake, |ex| {
            stake::handler(
                ex,
                caller,
                payment,
                epochs_locked,
                routing_paths,
                min_liquidity_a,
                min_liquidity_b,
                native_value,
            )
        })
    }

    /// Pull `amount` reward tokens from `caller` into the reserve.
    pub fn update_reward_reserve(&mut self, caller: &Pubkey, amount: u128) -> Result<()> {
        self.atomic(Entry::UpdateRewardReserve, |ex| {
            update_reward_reserve::handler(ex, caller, amount)
        })
    }

    /// Pay out what `nonce` has accrued; the position moves to a new nonce.
    pub fn claim_rewards(&mut self, caller: &Pubkey, nonce: u64) -> Result<Claim> {
        self.atomic(Entry::ClaimRewards, |ex| claim_rewards::handler(ex, caller, nonce))
    }

    fn atomic<T>(&mut self, entry: Entry, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.guards.enter(entry)?;

        let core = self.core.clone();
        let assets = self.assets.checkpoint();
        let pools = self.pools.checkpoint();

        let result = op(self);
        if let Err(err) = &result {
            warn!("{} reverted: {}", entry.name(), err);
            self.core = core;
            self.assets.rollback(assets);
            self.pools.rollback(pools);
        }

        self.guards.exit(entry);
        result
    }

    // ── Read operations ───────────────────────────────────────────────────────

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn all_pairs_length(&self) -> u64 {
        self.core.registry.all_pairs_length()
    }

    pub fn all_pairs(&self, index: u64) -> Option<Pubkey> {
        self.core.registry.all_pairs(index)
    }

    /// Pool address for a pair in either order; the native sentinel resolves
    /// to the wrapped-native token.
    pub fn get_pair(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<Pubkey> {
        self.core
            .registry
            .get_pair(&self.config.normalize(*token_a), &self.config.normalize(*token_b))
    }

    pub fn pool(&self, address: &Pubkey) -> Option<&Pool> {
        self.core.registry.pool(address)
    }

    pub fn registry(&self) -> &PairRegistry {
        &self.core.registry
    }

    /// The position at `nonce`, provided `owner` currently holds it.
    pub fn get_balance_at(&self, owner: &Pubkey, nonce: u64) -> Result<&StakePosition> {
        self.core.rewards.position(owner, nonce)
    }

    pub fn positions_of(&self, owner: &Pubkey) -> Vec<&StakePosition> {
        self.core.rewards.ledger().positions_of(owner)
    }

    /// Any snapshot ever written, including superseded ones.
    pub fn position_snapshot(&self, nonce: u64) -> Option<&StakePosition> {
        self.core.rewards.ledger().snapshot(nonce)
    }

    pub fn position_lineage(&self, nonce: u64) -> Vec<&StakePosition> {
        self.core.rewards.ledger().lineage(nonce)
    }

    pub fn pending_rewards(&self, owner: &Pubkey, nonce: u64) -> Result<u128> {
        self.core.rewards.pending_rewards(owner, nonce)
    }

    pub fn is_unlockable(&self, owner: &Pubkey, nonce: u64) -> Result<bool> {
        let position = self.get_balance_at(owner, nonce)?;
        Ok(position.attributes.is_unlockable(self.current_epoch()))
    }

    pub fn reward_per_share(&self) -> U256 {
        self.core.rewards.reward_per_share()
    }

    pub fn current_epoch(&self) -> u64 {
        self.clock.current_epoch()
    }

    pub fn total_stake_weight(&self) -> u128 {
        self.core.rewards.state().total_stake_weight
    }

    pub fn rewards_reserve(&self) -> u128 {
        self.core.rewards.state().reserve
    }

    pub fn events(&self) -> &[ExchangeEvent] {
        &self.core.events
    }

    pub fn take_events(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.core.events)
    }

    // ── Collaborators ─────────────────────────────────────────────────────────

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn pools(&self) -> &P {
        &self.pools
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
