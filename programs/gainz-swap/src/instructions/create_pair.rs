use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::{
    collaborators::{AssetLedger, EpochClock, PricingPools},
    error::Result,
    events::ExchangeEvent,
    exchange::Exchange,
    router,
    state::{Pool, TokenPayment},
};

/// Register a pool for the payments' tokens, instantiate it at its derived
/// address and seed it with both payments. LP is credited to `caller`.
///
/// The registry is consulted before anything is escrowed, so a duplicate
/// pair (either order) fails with `PairExists` without moving funds.
pub fn handler<A, P, C>(
    ex: &mut Exchange<A, P, C>,
    caller: &Pubkey,
    payment_a: TokenPayment,
    payment_b: TokenPayment,
    native_value: u128,
) -> Result<Pool>
where
    A: AssetLedger,
    P: PricingPools,
    C: EpochClock,
{
    router::validate_payments(&[payment_a, payment_b], native_value)?;

    let token_a = ex.config.normalize(payment_a.token);
    let token_b = ex.config.normalize(payment_b.token);
    let pool = ex.core.registry.create_pair(token_a, token_b)?;

    router::escrow(&mut ex.assets, &ex.config, caller, &payment_a)?;
    router::escrow(&mut ex.assets, &ex.config, caller, &payment_b)?;

    ex.pools.create_pool(&pool)?;

    let offered = if token_a == pool.token0 {
        (payment_a.amount, payment_b.amount)
    } else {
        (payment_b.amount, payment_a.amount)
    };
    let custody = ex.config.custody;
    let receipt = router::deposit(
        &mut ex.assets,
        &mut ex.pools,
        &custody,
        &pool,
        offered.0,
        offered.1,
        caller,
    )?;
    router::refund_leftovers(&mut ex.assets, &custody, caller, &pool, offered, &receipt)?;

    let total_pairs = ex.core.registry.all_pairs_length();
    ex.core.events.push(ExchangeEvent::PairCreated {
        token0: pool.token0,
        token1: pool.token1,
        pool: pool.address,
        total_pairs,
    });

    info!(
        "Pair created: {}/{} at {} lp={} total_pairs={}",
        pool.token0, pool.token1, pool.address, receipt.liquidity, total_pairs
    );
    Ok(pool)
}
