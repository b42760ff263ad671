//! Records emitted by the exchange.
//!
//! Integrators decode these from bytes, so the layout is fixed: a one-byte
//! tag, then fields in declaration order, integers little-endian, keys as
//! 32 raw bytes, the accumulator as a 32-byte little-endian U256.
//!
//! ```text
//! PairCreated          0 | token0(32) token1(32) pool(32) total_pairs(8)          = 105
//! PositionMinted       1 | owner(32) nonce(8) reward_per_share(32) epoch_staked(8)
//!                          epochs_locked(8) stake_weight(16) lp_count(4)
//!                          lp_count × [pool(32) token0(32) token1(32)
//!                                      liquidity(16) liquidity_value(16)]
//! RewardsClaimed       2 | owner(32) nonce(8) new_nonce(8) amount(16)             = 65
//! RewardReserveUpdated 3 | amount(16) reward_per_share(32) reserve(16)           = 65
//! ```

use ethnum::U256;
use solana_sdk::pubkey::Pubkey;

use crate::state::{StakeAttributes, StakePosition};

pub const PAIR_CREATED_TAG: u8 = 0;
pub const POSITION_MINTED_TAG: u8 = 1;
pub const REWARDS_CLAIMED_TAG: u8 = 2;
pub const REWARD_RESERVE_UPDATED_TAG: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    PairCreated {
        token0: Pubkey,
        token1: Pubkey,
        pool: Pubkey,
        total_pairs: u64,
    },
    PositionMinted {
        owner: Pubkey,
        nonce: u64,
        attributes: StakeAttributes,
    },
    RewardsClaimed {
        owner: Pubkey,
        nonce: u64,
        new_nonce: u64,
        amount: u128,
    },
    RewardReserveUpdated {
        amount: u128,
        reward_per_share: U256,
        reserve: u128,
    },
}

impl ExchangeEvent {
    pub fn position_minted(position: &StakePosition) -> Self {
        ExchangeEvent::PositionMinted {
            owner: position.owner,
            nonce: position.nonce,
            attributes: position.attributes.clone(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ExchangeEvent::PairCreated { token0, token1, pool, total_pairs } => {
                let mut out = Vec::with_capacity(105);
                out.push(PAIR_CREATED_TAG);
                out.extend_from_slice(token0.as_ref());
                out.extend_from_slice(token1.as_ref());
                out.extend_from_slice(pool.as_ref());
                out.extend_from_slice(&total_pairs.to_le_bytes());
                out
            }
            ExchangeEvent::PositionMinted { owner, nonce, attributes } => {
                let mut out = Vec::with_capacity(109 + 128 * attributes.lp_details.len());
                out.push(POSITION_MINTED_TAG);
                out.extend_from_slice(owner.as_ref());
                out.extend_from_slice(&nonce.to_le_bytes());
                out.extend_from_slice(&attributes.reward_per_share.to_le_bytes());
                out.extend_from_slice(&attributes.epoch_staked.to_le_bytes());
                out.extend_from_slice(&attributes.epochs_locked.to_le_bytes());
                out.extend_from_slice(&attributes.stake_weight.to_le_bytes());
                out.extend_from_slice(&(attributes.lp_details.len() as u32).to_le_bytes());
                for lp in &attributes.lp_details {
                    out.extend_from_slice(lp.pool.as_ref());
                    out.extend_from_slice(lp.token0.as_ref());
                    out.extend_from_slice(lp.token1.as_ref());
                    out.extend_from_slice(&lp.liquidity.to_le_bytes());
                    out.extend_from_slice(&lp.liquidity_value.to_le_bytes());
                }
                out
            }
            ExchangeEvent::RewardsClaimed { owner, nonce, new_nonce, amount } => {
                let mut out = Vec::with_capacity(65);
                out.push(REWARDS_CLAIMED_TAG);
                out.extend_from_slice(owner.as_ref());
                out.extend_from_slice(&nonce.to_le_bytes());
                out.extend_from_slice(&new_nonce.to_le_bytes());
                out.extend_from_slice(&amount.to_le_bytes());
                out
            }
            ExchangeEvent::RewardReserveUpdated { amount, reward_per_share, reserve } => {
                let mut out = Vec::with_capacity(65);
                out.push(REWARD_RESERVE_UPDATED_TAG);
                out.extend_from_slice(&amount.to_le_bytes());
                out.extend_from_slice(&reward_per_share.to_le_bytes());
                out.extend_from_slice(&reserve.to_le_bytes());
                out
            }
        }
    }
}
