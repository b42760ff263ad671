//! Pool address precomputation.
//!
//! Lets an integrator know where a pair's pool lives before it is created.

use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

// ─── Seeds (mirrors programs/gainz-swap/src/constants.rs) ────────────────────

pub const POOL_SEED: &[u8] = b"pool";

/// Sentinel identity for the chain's native coin.
pub const NATIVE_TOKEN: Pubkey = Pubkey::new_from_array([0u8; 32]);

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Order a token pair ascending by its 32 raw bytes.
pub fn sort_tokens(token_a: &Pubkey, token_b: &Pubkey) -> Result<(Pubkey, Pubkey)> {
    if token_a == token_b {
        return Err(Error::IdenticalTokens);
    }
    if token_a < token_b {
        Ok((*token_a, *token_b))
    } else {
        Ok((*token_b, *token_a))
    }
}

/// Derive the pool address a registry will use for a pair, in either order.
pub fn derive_pool_address(
    registry_id: &Pubkey,
    token_a: &Pubkey,
    token_b: &Pubkey,
    implementation: &Pubkey,
) -> Result<(Pubkey, u8)> {
    let (token0, token1) = sort_tokens(token_a, token_b)?;
    Ok(Pubkey::find_program_address(
        &[POOL_SEED, token0.as_ref(), token1.as_ref(), implementation.as_ref()],
        registry_id,
    ))
}

/// Same as [`derive_pool_address`] but with the native sentinel mapped to
/// the wrapped-native token first.
pub fn derive_pool_address_with_native(
    registry_id: &Pubkey,
    token_a: &Pubkey,
    token_b: &Pubkey,
    implementation: &Pubkey,
    wrapped_native: &Pubkey,
) -> Result<(Pubkey, u8)> {
    let resolve = |token: &Pubkey| if *token == NATIVE_TOKEN { *wrapped_native } else { *token };
    derive_pool_address(registry_id, &resolve(token_a), &resolve(token_b), implementation)
}
