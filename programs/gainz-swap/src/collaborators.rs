//! Interfaces to the systems the exchange drives but does not own.
//!
//! Every collaborator the exchange mutates is [`Journaled`]: an entry point
//! checkpoints each one before it starts and rolls them back if it fails, so
//! a failed call leaves no partial transfer, swap or deposit behind.

use solana_sdk::pubkey::Pubkey;

use crate::{
    error::Result,
    state::{DepositReceipt, Pool},
};

/// Checkpoint/rollback over a collaborator's externally visible state.
pub trait Journaled {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

/// Token balances and transfers. Native-coin balances are held under the
/// wrapped-native identity.
pub trait AssetLedger: Journaled {
    fn transfer(
        &mut self,
        token: &Pubkey,
        nonce: u64,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()>;

    fn balance_of(&self, token: &Pubkey, nonce: u64, owner: &Pubkey) -> u128;
}

/// Pool instances and their pricing curve. Reserves move in the asset
/// ledger; the exchange performs those transfers around each call here.
pub trait PricingPools: Journaled {
    /// Instantiate the pool at its derived address.
    fn create_pool(&mut self, pool: &Pool) -> Result<()>;

    /// Add liquidity, minting LP to `provider`. The receipt reports how much
    /// of each amount the curve accepted.
    fn deposit(
        &mut self,
        pool: &Pubkey,
        amount0: u128,
        amount1: u128,
        provider: &Pubkey,
    ) -> Result<DepositReceipt>;

    /// Quote and apply a swap, returning the output amount.
    fn swap(&mut self, pool: &Pubkey, token_in: &Pubkey, amount_in: u128) -> Result<u128>;

    /// Value of `liquidity` LP units of `pool`, in the pool's valuation unit.
    fn liquidity_value(&self, pool: &Pubkey, liquidity: u128) -> Result<u128>;

    fn lp_balance_of(&self, pool: &Pubkey, owner: &Pubkey) -> u128;
}

/// Externally supplied, monotonic epoch counter.
pub trait EpochClock {
    fn current_epoch(&self) -> u64;
}
