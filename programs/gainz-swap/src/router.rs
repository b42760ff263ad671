//! Liquidity zap plumbing shared by `create_pair` and `stake`: payment
//! validation and escrow, hop-by-hop conversion, and balanced deposits.
//!
//! Every token movement goes through custody, so after an entry point
//! returns custody holds only the reward reserve.

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    collaborators::{AssetLedger, PricingPools},
    config::ExchangeConfig,
    constants::*,
    error::{ExchangeError, Result},
    registry::PairRegistry,
    state::{DepositReceipt, Pool, TokenPayment},
};

/// Check amounts and that attached native value matches the native payments.
pub fn validate_payments(payments: &[TokenPayment], native_value: u128) -> Result<()> {
    let mut native_total: u128 = 0;
    for payment in payments {
        if payment.amount == 0 {
            return Err(ExchangeError::InvalidPayment("amount must be greater than zero"));
        }
        if payment.token == NATIVE_TOKEN {
            native_total = native_total
                .checked_add(payment.amount)
                .ok_or(ExchangeError::MathOverflow)?;
        } else if payment.nonce != 0 {
            return Err(ExchangeError::InvalidPayment("sub-account tokens cannot be pooled"));
        }
    }
    if native_total != native_value {
        return Err(ExchangeError::InvalidPayment("attached value does not match native payment"));
    }
    Ok(())
}

/// Move a payment from `payer` into custody; returns the normalized token.
pub fn escrow<A: AssetLedger>(
    assets: &mut A,
    config: &ExchangeConfig,
    payer: &Pubkey,
    payment: &TokenPayment,
) -> Result<Pubkey> {
    let token = config.normalize(payment.token);
    assets.transfer(&token, 0, payer, &config.custody, payment.amount)?;
    Ok(token)
}

/// Hop sequences with the native sentinel mapped to the wrapped-native token.
pub fn normalize_paths(config: &ExchangeConfig, routing_paths: &[Vec<Pubkey>]) -> Vec<Vec<Pubkey>> {
    routing_paths
        .iter()
        .map(|path| path.iter().map(|token| config.normalize(*token)).collect())
        .collect()
}

/// Split the hop sequences into the two pool legs. Entries past the legs
/// must be empty.
pub fn pool_legs(routing_paths: &[Vec<Pubkey>]) -> Result<(&[Pubkey], &[Pubkey])> {
    if routing_paths.len() < POOL_LEGS {
        return Err(ExchangeError::InvalidPath("one hop sequence per pool leg is required"));
    }
    if routing_paths[POOL_LEGS..].iter().any(|extra| !extra.is_empty()) {
        return Err(ExchangeError::InvalidPath("only two legs can be routed"));
    }
    Ok((&routing_paths[0], &routing_paths[1]))
}

/// Halve `amount` between the legs; the odd unit goes to leg 0.
pub fn split_amount(amount: u128) -> Result<(u128, u128)> {
    if amount < 2 {
        return Err(ExchangeError::InvalidPayment("amount too small to split between legs"));
    }
    let leg1 = amount / 2;
    Ok((amount - leg1, leg1))
}

/// Convert `amount` of `input` held in custody along `path`, one registered
/// pool per hop. Returns the target token and the amount received.
pub fn execute_path<A: AssetLedger, P: PricingPools>(
    assets: &mut A,
    pools: &mut P,
    registry: &PairRegistry,
    custody: &Pubkey,
    path: &[Pubkey],
    input: Pubkey,
    amount: u128,
) -> Result<(Pubkey, u128)> {
    let Some(first) = path.first() else {
        return Ok((input, amount));
    };
    if *first != input {
        return Err(ExchangeError::InvalidPath("path must start at the payment token"));
    }

    let mut amount = amount;
    for hop in path.windows(2) {
        let (token_in, token_out) = (hop[0], hop[1]);
        let pool = registry
            .get_pair(&token_in, &token_out)
            .ok_or(ExchangeError::PairNotFound(token_in, token_out))?;

        assets.transfer(&token_in, 0, custody, &pool, amount)?;
        let amount_out = pools.swap(&pool, &token_in, amount)?;
        assets.transfer(&token_out, 0, &pool, custody, amount_out)?;

        debug!("hop {} -> {} via {}: in={} out={}", token_in, token_out, pool, amount, amount_out);
        amount = amount_out;
    }

    Ok((path[path.len() - 1], amount))
}

/// Deposit custody-held amounts into `pool`, crediting LP to `provider`, and
/// move exactly what the curve accepted into the pool.
pub fn deposit<A: AssetLedger, P: PricingPools>(
    assets: &mut A,
    pools: &mut P,
    custody: &Pubkey,
    pool: &Pool,
    amount0: u128,
    amount1: u128,
    provider: &Pubkey,
) -> Result<DepositReceipt> {
    let receipt = pools.deposit(&pool.address, amount0, amount1, provider)?;
    assets.transfer(&pool.token0, 0, custody, &pool.address, receipt.used0)?;
    assets.transfer(&pool.token1, 0, custody, &pool.address, receipt.used1)?;
    Ok(receipt)
}

/// Return what a deposit left behind in custody.
pub fn refund_leftovers<A: AssetLedger>(
    assets: &mut A,
    custody: &Pubkey,
    recipient: &Pubkey,
    pool: &Pool,
    offered: (u128, u128),
    receipt: &DepositReceipt,
) -> Result<()> {
    let left0 = offered.0.saturating_sub(receipt.used0);
    let left1 = offered.1.saturating_sub(receipt.used1);
    assets.transfer(&pool.token0, 0, custody, recipient, left0)?;
    assets.transfer(&pool.token1, 0, custody, recipient, left1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_value_must_match() {
        let native = TokenPayment::new(NATIVE_TOKEN, 10);
        let token = TokenPayment::new(Pubkey::new_unique(), 5);

        assert!(validate_payments(&[native, token], 10).is_ok());
        assert!(validate_payments(&[native, token], 9).is_err());
        assert!(validate_payments(&[token], 1).is_err());
        assert!(validate_payments(&[token], 0).is_ok());
    }

    #[test]
    fn zero_amount_rejected() {
        let empty = TokenPayment::new(Pubkey::new_unique(), 0);
        assert_eq!(
            validate_payments(&[empty], 0),
            Err(ExchangeError::InvalidPayment("amount must be greater than zero"))
        );
    }

    #[test]
    fn sub_account_tokens_rejected() {
        let mut payment = TokenPayment::new(Pubkey::new_unique(), 5);
        payment.nonce = 3;
        assert!(matches!(
            validate_payments(&[payment], 0),
            Err(ExchangeError::InvalidPayment(_))
        ));
    }

    #[test]
    fn legs_require_two_paths_and_empty_extras() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let paths = vec![vec![a], vec![a, b], vec![]];
        let (leg0, leg1) = pool_legs(&paths).unwrap();
        assert_eq!(leg0, &[a]);
        assert_eq!(leg1, &[a, b]);

        assert!(pool_legs(&[vec![a]]).is_err());
        assert!(pool_legs(&[vec![a], vec![b], vec![a]]).is_err());
    }

    #[test]
    fn native_sentinel_in_paths_resolves_to_wrapped() {
        let config = ExchangeConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        let token = Pubkey::new_unique();
        let paths = vec![vec![NATIVE_TOKEN], vec![NATIVE_TOKEN, token], vec![]];

        let normalized = normalize_paths(&config, &paths);
        assert_eq!(
            normalized,
            vec![vec![config.wrapped_native], vec![config.wrapped_native, token], vec![]]
        );
    }

    #[test]
    fn odd_unit_goes_to_first_leg() {
        assert_eq!(split_amount(5).unwrap(), (3, 2));
        assert_eq!(split_amount(4).unwrap(), (2, 2));
        assert!(split_amount(1).is_err());
    }
}
