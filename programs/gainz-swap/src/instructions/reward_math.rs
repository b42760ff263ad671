use ethnum::U256;

use crate::{constants::*, error::ExchangeError, error::Result};

/// Weight a stake by value and lock length.
///
/// `weight = liquidity_value * (epochs_locked + LOCK_WEIGHT_OFFSET)`
///
/// Strictly increasing in both arguments for any positive value.
pub fn stake_weight(liquidity_value: u128, epochs_locked: u64) -> Result<u128> {
    let multiplier = (epochs_locked as u128)
        .checked_add(LOCK_WEIGHT_OFFSET as u128)
        .ok_or(ExchangeError::MathOverflow)?;
    liquidity_value
        .checked_mul(multiplier)
        .ok_or(ExchangeError::MathOverflow)
}

/// Accumulator increase for distributing `amount` over `total_weight`.
///
/// `delta = floor(amount * 2^128 / total_weight)`; rounding down leaves the
/// dust in the reserve. Zero weight is `NoStakeWeight`; callers park the
/// amount as undistributed instead.
pub fn reward_per_share_delta(amount: u128, total_weight: u128) -> Result<U256> {
    if total_weight == 0 {
        return Err(ExchangeError::NoStakeWeight);
    }
    let scaled = U256::from(amount)
        .checked_mul(Q128)
        .ok_or(ExchangeError::MathOverflow)?;
    Ok(scaled / U256::from(total_weight))
}

/// Reward accrued by `stake_weight` between `snapshot` and `accumulator`.
///
/// `owed = floor((accumulator - snapshot) * stake_weight / 2^128)`
pub fn pending_reward(accumulator: U256, snapshot: U256, stake_weight: u128) -> Result<u128> {
    if accumulator <= snapshot {
        return Ok(0);
    }
    let delta = accumulator - snapshot;
    let owed = delta
        .checked_mul(U256::from(stake_weight))
        .ok_or(ExchangeError::MathOverflow)?
        / Q128;
    to_u128(owed)
}

fn to_u128(value: U256) -> Result<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(ExchangeError::MathOverflow);
    }
    Ok(lo)
}

/// `floor(a * b / denominator)` without intermediate overflow.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(ExchangeError::MathOverflow);
    }
    to_u128(U256::from(a) * U256::from(b) / U256::from(denominator))
}
