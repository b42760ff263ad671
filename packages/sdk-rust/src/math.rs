//! Reward preview math.
//!
//! Mirrors the exchange's accumulator arithmetic exactly so off-chain
//! previews match what a claim pays.

use ethnum::U256;

use crate::error::{Error, Result};
use crate::records::PositionMintedRecord;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Fixed-point scale of the reward-per-share accumulator (2^128).
pub const Q128: U256 = U256::from_words(1, 0);

/// Added to the lock length so an unlocked stake still carries weight.
pub const LOCK_WEIGHT_OFFSET: u64 = 1;

// ─── Previews ─────────────────────────────────────────────────────────────────

/// Weight a position of `liquidity_value` locked for `epochs_locked` carries.
pub fn stake_weight(liquidity_value: u128, epochs_locked: u64) -> Result<u128> {
    let multiplier = epochs_locked
        .checked_add(LOCK_WEIGHT_OFFSET)
        .ok_or(Error::MathOverflow)? as u128;
    liquidity_value.checked_mul(multiplier).ok_or(Error::MathOverflow)
}

/// Accumulator after `amount` is spread over `total_weight`.
///
/// Nothing moves while no weight is staked; the exchange holds such
/// donations back until the next top-up.
pub fn accumulator_after_donation(accumulator: U256, amount: u128, total_weight: u128) -> Result<U256> {
    if total_weight == 0 {
        return Ok(accumulator);
    }
    let delta = U256::from(amount)
        .checked_mul(Q128)
        .ok_or(Error::MathOverflow)?
        / U256::from(total_weight);
    accumulator.checked_add(delta).ok_or(Error::MathOverflow)
}

/// Rewards owed to a position: `weight * (accumulator - snapshot) / 2^128`.
pub fn pending_rewards(accumulator: U256, snapshot: U256, stake_weight: u128) -> Result<u128> {
    if accumulator <= snapshot {
        return Ok(0);
    }
    let owed = (accumulator - snapshot)
        .checked_mul(U256::from(stake_weight))
        .ok_or(Error::MathOverflow)?
        / Q128;
    let (high, low) = owed.into_words();
    if high != 0 {
        return Err(Error::MathOverflow);
    }
    Ok(low)
}

/// Preview for a decoded position record.
pub fn position_pending_rewards(accumulator: U256, position: &PositionMintedRecord) -> Result<u128> {
    pending_rewards(accumulator, position.reward_per_share, position.stake_weight)
}
