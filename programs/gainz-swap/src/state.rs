use ethnum::U256;
use solana_sdk::pubkey::Pubkey;

// ─── TokenPayment ──────────────────────────────────────────────────────────
// One asset handed to an exchange entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayment {
    /// Token identity; `NATIVE_TOKEN` for the chain's native coin
    pub token: Pubkey,
    /// Sub-account nonce (0 for plain fungible tokens)
    pub nonce: u64,
    pub amount: u128,
}

impl TokenPayment {
    pub fn new(token: Pubkey, amount: u128) -> Self {
        Self { token, nonce: 0, amount }
    }
}

// ─── Pool ──────────────────────────────────────────────────────────────────
// Catalogue entry written once by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    /// Lower identity of the pair
    pub token0: Pubkey,
    pub token1: Pubkey,
    /// Derived from (registry, token0, token1, implementation)
    pub address: Pubkey,
    pub bump: u8,
    /// Position in the registry's insertion order
    pub index: u64,
}

impl Pool {
    pub fn contains(&self, token: &Pubkey) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// The other side of the pair, if `token` belongs to it.
    pub fn counterpart(&self, token: &Pubkey) -> Option<Pubkey> {
        if self.token0 == *token {
            Some(self.token1)
        } else if self.token1 == *token {
            Some(self.token0)
        } else {
            None
        }
    }
}

/// What the pricing backend reports for one liquidity deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    pub liquidity: u128,
    pub used0: u128,
    pub used1: u128,
}

// ─── StakePosition ─────────────────────────────────────────────────────────
// Immutable snapshot. A claim writes a successor at a new nonce instead of
// touching this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LpDetail {
    pub pool: Pubkey,
    pub token0: Pubkey,
    pub token1: Pubkey,
    pub liquidity: u128,
    /// Value of `liquidity` as quoted by the pricing backend at stake time
    pub liquidity_value: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeAttributes {
    /// Accumulator value this snapshot has been paid up to (Q128)
    pub reward_per_share: U256,
    pub epoch_staked: u64,
    pub epochs_locked: u64,
    pub stake_weight: u128,
    pub lp_details: Vec<LpDetail>,
}

impl StakeAttributes {
    pub fn total_liquidity_value(&self) -> Option<u128> {
        self.lp_details
            .iter()
            .try_fold(0u128, |acc, lp| acc.checked_add(lp.liquidity_value))
    }

    /// Epoch at which the lock has fully elapsed.
    pub fn unlock_epoch(&self) -> u64 {
        self.epoch_staked.saturating_add(self.epochs_locked)
    }

    pub fn is_unlockable(&self, current_epoch: u64) -> bool {
        current_epoch.saturating_sub(self.epoch_staked) >= self.epochs_locked
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakePosition {
    pub owner: Pubkey,
    pub nonce: u64,
    pub attributes: StakeAttributes,
}

// ─── GlobalRewardState ─────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRewardState {
    /// Cumulative reward per unit of stake weight, Q128 fixed-point
    pub reward_per_share: U256,
    /// Reward tokens held for claimants (includes `undistributed`)
    pub reserve: u128,
    /// Donations received while no stake weight existed
    pub undistributed: u128,
    pub total_stake_weight: u128,
}

impl Default for GlobalRewardState {
    fn default() -> Self {
        Self {
            reward_per_share: U256::ZERO,
            reserve: 0,
            undistributed: 0,
            total_stake_weight: 0,
        }
    }
}
