use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::{
    collaborators::{AssetLedger, EpochClock, PricingPools},
    error::Result,
    events::ExchangeEvent,
    exchange::Exchange,
    rewards::Claim,
};

/// Pay `caller` what position `nonce` has accrued since its snapshot.
///
/// The position is superseded, not updated: the successor carries the same
/// lock and liquidity at a new nonce with its snapshot at the current
/// accumulator. Fails with `NothingToClaim` when nothing has accrued.
pub fn handler<A, P, C>(ex: &mut Exchange<A, P, C>, caller: &Pubkey, nonce: u64) -> Result<Claim>
where
    A: AssetLedger,
    P: PricingPools,
    C: EpochClock,
{
    let claim = ex.core.rewards.claim(caller, nonce)?;

    ex.assets.transfer(
        &ex.config.reward_token,
        0,
        &ex.config.custody,
        caller,
        claim.amount,
    )?;

    let successor = ex.core.rewards.position(caller, claim.new_nonce)?;
    let minted = ExchangeEvent::position_minted(successor);
    ex.core.events.push(ExchangeEvent::RewardsClaimed {
        owner: *caller,
        nonce,
        new_nonce: claim.new_nonce,
        amount: claim.amount,
    });
    ex.core.events.push(minted);

    info!(
        "Rewards claimed: owner={} amount={} nonce {} -> {}",
        caller, claim.amount, nonce, claim.new_nonce
    );
    Ok(claim)
}
