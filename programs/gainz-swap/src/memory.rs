//! In-memory collaborators for simulation and tests.
//!
//! [`MemoryPools`] prices with a fee-less constant-product curve; LP value is
//! quoted in units of the pool's `token0`.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::{
    collaborators::{AssetLedger, EpochClock, Journaled, PricingPools},
    error::{ExchangeError, Result},
    instructions::reward_math::mul_div,
    state::{DepositReceipt, Pool},
};

// ─── Assets ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    balances: HashMap<(Pubkey, u64, Pubkey), u128>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `owner` out of thin air.
    pub fn mint(&mut self, token: &Pubkey, owner: &Pubkey, amount: u128) {
        let balance = self.balances.entry((*token, 0, *owner)).or_default();
        *balance = balance.saturating_add(amount);
    }
}

impl Journaled for MemoryAssets {
    type Checkpoint = HashMap<(Pubkey, u64, Pubkey), u128>;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.balances.clone()
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        self.balances = checkpoint;
    }
}

impl AssetLedger for MemoryAssets {
    fn transfer(
        &mut self,
        token: &Pubkey,
        nonce: u64,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()> {
        if amount == 0 || from == to {
            return Ok(());
        }
        let available = self.balance_of(token, nonce, from);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                token: *token,
                owner: *from,
                needed: amount,
                available,
            });
        }
        self.balances.insert((*token, nonce, *from), available - amount);
        let credit = self.balances.entry((*token, nonce, *to)).or_default();
        *credit = credit.checked_add(amount).ok_or(ExchangeError::MathOverflow)?;
        Ok(())
    }

    fn balance_of(&self, token: &Pubkey, nonce: u64, owner: &Pubkey) -> u128 {
        self.balances
            .get(&(*token, nonce, *owner))
            .copied()
            .unwrap_or(0)
    }
}

// ─── Pools ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PoolReserves {
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub reserve0: u128,
    pub reserve1: u128,
    pub lp_supply: u128,
    lp_balances: HashMap<Pubkey, u128>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPools {
    pools: HashMap<Pubkey, PoolReserves>,
}

impl MemoryPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserves(&self, pool: &Pubkey) -> Option<&PoolReserves> {
        self.pools.get(pool)
    }

    fn get_mut(&mut self, pool: &Pubkey) -> Result<&mut PoolReserves> {
        self.pools
            .get_mut(pool)
            .ok_or(ExchangeError::PoolNotInitialized(*pool))
    }
}

// ─── Integer square root (Babylonian method) ──────────────────────────────
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x >> 1) + (x & 1);
    while y < x {
        x = y;
        y = (y + n / y) >> 1;
    }
    x
}

impl Journaled for MemoryPools {
    type Checkpoint = HashMap<Pubkey, PoolReserves>;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.pools.clone()
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        self.pools = checkpoint;
    }
}

impl PricingPools for MemoryPools {
    fn create_pool(&mut self, pool: &Pool) -> Result<()> {
        if self.pools.contains_key(&pool.address) {
            return Err(ExchangeError::PairExists(pool.token0, pool.token1));
        }
        self.pools.insert(
            pool.address,
            PoolReserves {
                token0: pool.token0,
                token1: pool.token1,
                reserve0: 0,
                reserve1: 0,
                lp_supply: 0,
                lp_balances: HashMap::new(),
            },
        );
        Ok(())
    }

    fn deposit(
        &mut self,
        pool: &Pubkey,
        amount0: u128,
        amount1: u128,
        provider: &Pubkey,
    ) -> Result<DepositReceipt> {
        if amount0 == 0 || amount1 == 0 {
            return Err(ExchangeError::InvalidPayment("deposit amounts must be positive"));
        }
        let address = *pool;
        let pool = self.get_mut(pool)?;

        let (used0, used1, liquidity) = if pool.lp_supply == 0 {
            // First deposit sets the price: LP = sqrt(a * b)
            let product = amount0
                .checked_mul(amount1)
                .ok_or(ExchangeError::MathOverflow)?;
            (amount0, amount1, isqrt(product))
        } else {
            // Take the largest deposit that matches the current ratio
            let optimal1 = mul_div(amount0, pool.reserve1, pool.reserve0)?;
            let (used0, used1) = if optimal1 <= amount1 {
                (amount0, optimal1)
            } else {
                (mul_div(amount1, pool.reserve0, pool.reserve1)?, amount1)
            };
            let lp0 = mul_div(used0, pool.lp_supply, pool.reserve0)?;
            let lp1 = mul_div(used1, pool.lp_supply, pool.reserve1)?;
            (used0, used1, lp0.min(lp1))
        };

        if liquidity == 0 {
            return Err(ExchangeError::InsufficientLiquidity(address));
        }

        pool.reserve0 = pool.reserve0.checked_add(used0).ok_or(ExchangeError::MathOverflow)?;
        pool.reserve1 = pool.reserve1.checked_add(used1).ok_or(ExchangeError::MathOverflow)?;
        pool.lp_supply = pool
            .lp_supply
            .checked_add(liquidity)
            .ok_or(ExchangeError::MathOverflow)?;
        *pool.lp_balances.entry(*provider).or_default() += liquidity;

        Ok(DepositReceipt { liquidity, used0, used1 })
    }

    fn swap(&mut self, pool: &Pubkey, token_in: &Pubkey, amount_in: u128) -> Result<u128> {
        let address = *pool;
        let pool = self.get_mut(pool)?;
        let a_to_b = if *token_in == pool.token0 {
            true
        } else if *token_in == pool.token1 {
            false
        } else {
            return Err(ExchangeError::InvalidPath("token is not part of the hop's pool"));
        };

        let (reserve_in, reserve_out) = if a_to_b {
            (pool.reserve0, pool.reserve1)
        } else {
            (pool.reserve1, pool.reserve0)
        };
        if reserve_in == 0 || reserve_out == 0 {
            return Err(ExchangeError::InsufficientLiquidity(address));
        }

        // dy = y * dx / (x + dx)
        let amount_out = mul_div(
            reserve_out,
            amount_in,
            reserve_in.checked_add(amount_in).ok_or(ExchangeError::MathOverflow)?,
        )?;
        if amount_out == 0 {
            return Err(ExchangeError::InsufficientLiquidity(address));
        }

        if a_to_b {
            pool.reserve0 += amount_in;
            pool.reserve1 -= amount_out;
        } else {
            pool.reserve1 += amount_in;
            pool.reserve0 -= amount_out;
        }
        Ok(amount_out)
    }

    fn liquidity_value(&self, pool: &Pubkey, liquidity: u128) -> Result<u128> {
        let reserves = self
            .pools
            .get(pool)
            .ok_or(ExchangeError::PoolNotInitialized(*pool))?;
        if reserves.lp_supply == 0 {
            return Err(ExchangeError::InsufficientLiquidity(*pool));
        }
        // Both sides at spot price, expressed in token0
        let share0 = mul_div(reserves.reserve0, liquidity, reserves.lp_supply)?;
        share0.checked_mul(2).ok_or(ExchangeError::MathOverflow)
    }

    fn lp_balance_of(&self, pool: &Pubkey, owner: &Pubkey) -> u128 {
        self.pools
            .get(pool)
            .and_then(|p| p.lp_balances.get(owner))
            .copied()
            .unwrap_or(0)
    }
}

// ─── Clock ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    epoch: u64,
}

impl ManualClock {
    pub fn new(epoch: u64) -> Self {
        Self { epoch }
    }

    pub fn advance(&mut self, epochs: u64) {
        self.epoch = self.epoch.saturating_add(epochs);
    }
}

impl EpochClock for ManualClock {
    fn current_epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Pool {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };
        Pool { token0, token1, address: Pubkey::new_unique(), bump: 255, index: 0 }
    }

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(u128::MAX), u64::MAX as u128);
    }

    #[test]
    fn transfer_moves_and_rejects_overdraft() {
        let mut assets = MemoryAssets::new();
        let (token, alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        assets.mint(&token, &alice, 100);

        assets.transfer(&token, 0, &alice, &bob, 40).unwrap();
        assert_eq!(assets.balance_of(&token, 0, &alice), 60);
        assert_eq!(assets.balance_of(&token, 0, &bob), 40);

        assert!(matches!(
            assets.transfer(&token, 0, &alice, &bob, 61),
            Err(ExchangeError::InsufficientBalance { needed: 61, available: 60, .. })
        ));
    }

    #[test]
    fn rollback_restores_balances() {
        let mut assets = MemoryAssets::new();
        let (token, alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        assets.mint(&token, &alice, 10);
        let checkpoint = assets.checkpoint();
        assets.transfer(&token, 0, &alice, &bob, 10).unwrap();
        assets.rollback(checkpoint);
        assert_eq!(assets.balance_of(&token, 0, &alice), 10);
        assert_eq!(assets.balance_of(&token, 0, &bob), 0);
    }

    #[test]
    fn deposits_follow_pool_ratio() {
        let mut pools = MemoryPools::new();
        let pool = pool();
        let provider = Pubkey::new_unique();
        pools.create_pool(&pool).unwrap();

        let first = pools.deposit(&pool.address, 400, 100, &provider).unwrap();
        assert_eq!(first.liquidity, 200);

        let second = pools.deposit(&pool.address, 400, 500, &provider).unwrap();
        assert_eq!((second.used0, second.used1, second.liquidity), (400, 100, 200));
        assert_eq!(pools.lp_balance_of(&pool.address, &provider), 400);
        assert_eq!(pools.liquidity_value(&pool.address, 200).unwrap(), 800);
    }

    #[test]
    fn swap_preserves_product() {
        let mut pools = MemoryPools::new();
        let pool = pool();
        pools.create_pool(&pool).unwrap();
        pools.deposit(&pool.address, 1_000, 1_000, &Pubkey::new_unique()).unwrap();

        let out = pools.swap(&pool.address, &pool.token0, 1_000).unwrap();
        assert_eq!(out, 500);
        let reserves = pools.reserves(&pool.address).unwrap();
        assert!(reserves.reserve0 * reserves.reserve1 >= 1_000 * 1_000);
        assert!(matches!(
            pools.swap(&pool.address, &Pubkey::new_unique(), 1),
            Err(ExchangeError::InvalidPath(_))
        ));
    }

    #[test]
    fn swap_on_empty_pool_fails() {
        let mut pools = MemoryPools::new();
        let pool = pool();
        pools.create_pool(&pool).unwrap();
        assert_eq!(
            pools.swap(&pool.address, &pool.token1, 10),
            Err(ExchangeError::InsufficientLiquidity(pool.address))
        );
    }
}
