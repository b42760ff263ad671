use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::{
    collaborators::{AssetLedger, EpochClock, PricingPools},
    error::{ExchangeError, Result},
    events::ExchangeEvent,
    exchange::Exchange,
    router,
    state::{LpDetail, TokenPayment},
};

/// Zap a single payment into a balanced deposit and stake the liquidity.
///
/// Flow:
///   0. native sentinel in payment and paths → wrapped-native token
///   1. payment → custody (native must be matched by `native_value`)
///   2. halve it; route each half along its leg's hop sequence
///   3. deposit both legs into the pool they end in; LP stays in custody
///   4. refund what the curve did not take
///   5. open a position for the liquidity, locked for `epochs_locked`
///
/// `min_liquidity_a` / `min_liquidity_b` bound the amounts of leg 0's and
/// leg 1's target token the deposit actually took.
#[allow(clippy::too_many_arguments)]
pub fn handler<A, P, C>(
    ex: &mut Exchange<A, P, C>,
    caller: &Pubkey,
    payment: TokenPayment,
    epochs_locked: u64,
    routing_paths: &[Vec<Pubkey>],
    min_liquidity_a: u128,
    min_liquidity_b: u128,
    native_value: u128,
) -> Result<u64>
where
    A: AssetLedger,
    P: PricingPools,
    C: EpochClock,
{
    router::validate_payments(&[payment], native_value)?;
    let routing_paths = router::normalize_paths(&ex.config, routing_paths);
    let (path_a, path_b) = router::pool_legs(&routing_paths)?;
    let (amount_a, amount_b) = router::split_amount(payment.amount)?;

    let input = router::escrow(&mut ex.assets, &ex.config, caller, &payment)?;
    let custody = ex.config.custody;

    // ── Conversion ───────────────────────────────────────────────────────────
    let (token_a, out_a) = router::execute_path(
        &mut ex.assets,
        &mut ex.pools,
        &ex.core.registry,
        &custody,
        path_a,
        input,
        amount_a,
    )?;
    let (token_b, out_b) = router::execute_path(
        &mut ex.assets,
        &mut ex.pools,
        &ex.core.registry,
        &custody,
        path_b,
        input,
        amount_b,
    )?;
    if token_a == token_b {
        return Err(ExchangeError::InvalidPath("legs must end in different tokens"));
    }
    debug!("zap legs: {}={} {}={}", token_a, out_a, token_b, out_b);

    // ── Deposit ──────────────────────────────────────────────────────────────
    let pool = ex
        .core
        .registry
        .pair(&token_a, &token_b)
        .cloned()
        .ok_or(ExchangeError::PairNotFound(token_a, token_b))?;
    let a_is_token0 = token_a == pool.token0;
    let offered = if a_is_token0 { (out_a, out_b) } else { (out_b, out_a) };

    let receipt = router::deposit(
        &mut ex.assets,
        &mut ex.pools,
        &custody,
        &pool,
        offered.0,
        offered.1,
        &custody,
    )?;

    let (realized_a, realized_b) = if a_is_token0 {
        (receipt.used0, receipt.used1)
    } else {
        (receipt.used1, receipt.used0)
    };
    if realized_a < min_liquidity_a {
        return Err(ExchangeError::SlippageExceeded { realized: realized_a, min: min_liquidity_a });
    }
    if realized_b < min_liquidity_b {
        return Err(ExchangeError::SlippageExceeded { realized: realized_b, min: min_liquidity_b });
    }

    router::refund_leftovers(&mut ex.assets, &custody, caller, &pool, offered, &receipt)?;

    // ── Stake ────────────────────────────────────────────────────────────────
    let liquidity_value = ex.pools.liquidity_value(&pool.address, receipt.liquidity)?;
    let lp = LpDetail {
        pool: pool.address,
        token0: pool.token0,
        token1: pool.token1,
        liquidity: receipt.liquidity,
        liquidity_value,
    };

    let epoch = ex.clock.current_epoch();
    let nonce = ex.core.rewards.stake(*caller, epoch, epochs_locked, vec![lp])?;
    let position = ex.core.rewards.position(caller, nonce)?;
    let event = ExchangeEvent::position_minted(position);
    info!(
        "Staked: owner={} nonce={} pool={} lp={} value={} weight={} epochs_locked={}",
        caller,
        nonce,
        pool.address,
        receipt.liquidity,
        liquidity_value,
        position.attributes.stake_weight,
        epochs_locked
    );
    ex.core.events.push(event);
    Ok(nonce)
}
