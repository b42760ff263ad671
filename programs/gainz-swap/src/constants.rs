use ethnum::U256;
use solana_sdk::pubkey::Pubkey;

/// Address seeds
pub const POOL_SEED: &[u8] = b"pool";

/// Sentinel identity for the chain's native coin. Payments in this identity
/// are normalized to the configured wrapped-native token before use.
pub const NATIVE_TOKEN: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Default lock policy, in epochs (one epoch per day → three years max)
pub const MIN_EPOCHS_LOCK_DEFAULT: u64 = 0;
pub const MAX_EPOCHS_LOCK_DEFAULT: u64 = 1080;

/// Added to `epochs_locked` when weighting a stake, so a zero-epoch lock
/// still carries the bare liquidity value.
pub const LOCK_WEIGHT_OFFSET: u64 = 1;

/// Number of hop sequences that name the two legs of the target pool.
pub const POOL_LEGS: usize = 2;

/// Q128 fixed-point scale for the reward-per-share accumulator.
pub const Q128: U256 = U256::from_words(1, 0);
