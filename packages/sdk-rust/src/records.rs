//! Event record deserialization.
//!
//! Parses the byte records the exchange emits. Every record starts with a
//! one-byte tag; integers are little-endian, keys are 32 raw bytes and the
//! reward accumulator is a 32-byte little-endian Q128.128 value.

use ethnum::U256;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

pub const PAIR_CREATED_TAG: u8 = 0;
pub const POSITION_MINTED_TAG: u8 = 1;
pub const REWARDS_CLAIMED_TAG: u8 = 2;
pub const REWARD_RESERVE_UPDATED_TAG: u8 = 3;

const POSITION_HEADER_LEN: usize = 109;
const LP_DETAIL_LEN: usize = 128;

// ─── Records ──────────────────────────────────────────────────────────────────

/// Layout:
/// ```text
/// tag(1)  token0(32)  token1(32)  pool(32)  total_pairs(8)  = 105 bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCreatedRecord {
    pub token0:      Pubkey,
    pub token1:      Pubkey,
    pub pool:        Pubkey,
    pub total_pairs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpDetailRecord {
    pub pool:            Pubkey,
    pub token0:          Pubkey,
    pub token1:          Pubkey,
    pub liquidity:       u128,
    pub liquidity_value: u128,
}

/// Layout:
/// ```text
/// tag(1)  owner(32)  nonce(8)  reward_per_share(32)  epoch_staked(8)
/// epochs_locked(8)  stake_weight(16)  lp_count(4)  = 109 bytes
/// then lp_count × [pool(32) token0(32) token1(32) liquidity(16) liquidity_value(16)]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMintedRecord {
    pub owner:            Pubkey,
    pub nonce:            u64,
    /// Accumulator snapshot, Q128.128 fixed-point.
    pub reward_per_share: U256,
    pub epoch_staked:     u64,
    pub epochs_locked:    u64,
    pub stake_weight:     u128,
    pub lp_details:       Vec<LpDetailRecord>,
}

impl PositionMintedRecord {
    pub fn unlock_epoch(&self) -> u64 {
        self.epoch_staked.saturating_add(self.epochs_locked)
    }
}

/// Layout:
/// ```text
/// tag(1)  owner(32)  nonce(8)  new_nonce(8)  amount(16)  = 65 bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsClaimedRecord {
    pub owner:     Pubkey,
    pub nonce:     u64,
    pub new_nonce: u64,
    pub amount:    u128,
}

/// Layout:
/// ```text
/// tag(1)  amount(16)  reward_per_share(32)  reserve(16)  = 65 bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardReserveUpdatedRecord {
    pub amount:           u128,
    pub reward_per_share: U256,
    pub reserve:          u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    PairCreated(PairCreatedRecord),
    PositionMinted(PositionMintedRecord),
    RewardsClaimed(RewardsClaimedRecord),
    RewardReserveUpdated(RewardReserveUpdatedRecord),
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Deserialize any exchange record, dispatching on its tag byte.
pub fn parse_record(data: &[u8]) -> Result<Record> {
    let tag = *data.first().ok_or_else(|| Error::ParseError {
        offset: 0,
        reason: "empty record".into(),
    })?;
    match tag {
        PAIR_CREATED_TAG => parse_pair_created(data).map(Record::PairCreated),
        POSITION_MINTED_TAG => parse_position_minted(data).map(Record::PositionMinted),
        REWARDS_CLAIMED_TAG => parse_rewards_claimed(data).map(Record::RewardsClaimed),
        REWARD_RESERVE_UPDATED_TAG => {
            parse_reward_reserve_updated(data).map(Record::RewardReserveUpdated)
        }
        other => Err(Error::ParseError {
            offset: 0,
            reason: format!("unknown record tag {}", other),
        }),
    }
}

pub fn parse_pair_created(data: &[u8]) -> Result<PairCreatedRecord> {
    expect_record(data, PAIR_CREATED_TAG, 105, "PairCreated")?;
    Ok(PairCreatedRecord {
        token0:      read_pubkey(data, 1)?,
        token1:      read_pubkey(data, 33)?,
        pool:        read_pubkey(data, 65)?,
        total_pairs: read_u64(data, 97)?,
    })
}

pub fn parse_position_minted(data: &[u8]) -> Result<PositionMintedRecord> {
    expect_record(data, POSITION_MINTED_TAG, POSITION_HEADER_LEN, "PositionMinted")?;
    let lp_count = read_u32(data, 105)? as usize;
    let expected = lp_count
        .checked_mul(LP_DETAIL_LEN)
        .and_then(|len| len.checked_add(POSITION_HEADER_LEN))
        .ok_or(Error::MathOverflow)?;
    if data.len() != expected {
        return Err(Error::ParseError {
            offset: POSITION_HEADER_LEN,
            reason: format!(
                "PositionMinted with {} lp entries is {} bytes; expected {}",
                lp_count,
                data.len(),
                expected
            ),
        });
    }

    let lp_details = (0..lp_count)
        .map(|i| {
            let base = POSITION_HEADER_LEN + i * LP_DETAIL_LEN;
            Ok(LpDetailRecord {
                pool:            read_pubkey(data, base)?,
                token0:          read_pubkey(data, base + 32)?,
                token1:          read_pubkey(data, base + 64)?,
                liquidity:       read_u128(data, base + 96)?,
                liquidity_value: read_u128(data, base + 112)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PositionMintedRecord {
        owner:            read_pubkey(data, 1)?,
        nonce:            read_u64(data, 33)?,
        reward_per_share: read_u256(data, 41)?,
        epoch_staked:     read_u64(data, 73)?,
        epochs_locked:    read_u64(data, 81)?,
        stake_weight:     read_u128(data, 89)?,
        lp_details,
    })
}

pub fn parse_rewards_claimed(data: &[u8]) -> Result<RewardsClaimedRecord> {
    expect_record(data, REWARDS_CLAIMED_TAG, 65, "RewardsClaimed")?;
    Ok(RewardsClaimedRecord {
        owner:     read_pubkey(data, 1)?,
        nonce:     read_u64(data, 33)?,
        new_nonce: read_u64(data, 41)?,
        amount:    read_u128(data, 49)?,
    })
}

pub fn parse_reward_reserve_updated(data: &[u8]) -> Result<RewardReserveUpdatedRecord> {
    expect_record(data, REWARD_RESERVE_UPDATED_TAG, 65, "RewardReserveUpdated")?;
    Ok(RewardReserveUpdatedRecord {
        amount:           read_u128(data, 1)?,
        reward_per_share: read_u256(data, 17)?,
        reserve:          read_u128(data, 49)?,
    })
}

fn expect_record(data: &[u8], tag: u8, min_len: usize, name: &str) -> Result<()> {
    if data.len() < min_len {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("{} record is {} bytes; expected {}", name, data.len(), min_len),
        });
    }
    if data[0] != tag {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("{} record has tag {}; expected {}", name, data[0], tag),
        });
    }
    Ok(())
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| Error::ParseError {
            offset,
            reason: format!("slice too short for {} bytes", N),
        })
}

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    Ok(Pubkey::from(read_array::<32>(data, offset)?))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(data, offset)?))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array(data, offset)?))
}

pub(crate) fn read_u128(data: &[u8], offset: usize) -> Result<u128> {
    Ok(u128::from_le_bytes(read_array(data, offset)?))
}

pub(crate) fn read_u256(data: &[u8], offset: usize) -> Result<U256> {
    Ok(U256::from_le_bytes(read_array(data, offset)?))
}
