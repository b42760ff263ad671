use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::{
    collaborators::{AssetLedger, EpochClock, PricingPools},
    error::{ExchangeError, Result},
    events::ExchangeEvent,
    exchange::Exchange,
};

/// Pull `amount` of the reward token from `caller` into the reserve and
/// spread it over the current stake weight.
pub fn handler<A, P, C>(ex: &mut Exchange<A, P, C>, caller: &Pubkey, amount: u128) -> Result<()>
where
    A: AssetLedger,
    P: PricingPools,
    C: EpochClock,
{
    if amount == 0 {
        return Err(ExchangeError::InvalidPayment("reward amount must be positive"));
    }

    ex.assets.transfer(
        &ex.config.reward_token,
        0,
        caller,
        &ex.config.custody,
        amount,
    )?;
    ex.core.rewards.update_reward_reserve(amount)?;

    let state = ex.core.rewards.state();
    let event = ExchangeEvent::RewardReserveUpdated {
        amount,
        reward_per_share: state.reward_per_share,
        reserve: state.reserve,
    };
    info!(
        "Reward reserve topped up: amount={} reserve={} undistributed={} total_weight={}",
        amount, state.reserve, state.undistributed, state.total_stake_weight
    );
    ex.core.events.push(event);
    Ok(())
}
