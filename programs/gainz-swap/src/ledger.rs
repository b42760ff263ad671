//! Append-only store of stake-position snapshots.
//!
//! Nonces come from one global counter starting at 1, so a nonce identifies a
//! snapshot regardless of owner. A snapshot is never rewritten: superseding a
//! position releases the old nonce from its holder and mints the successor.

use std::collections::{BTreeSet, HashMap};

use solana_sdk::pubkey::Pubkey;

use crate::{
    error::{ExchangeError, Result},
    state::{StakeAttributes, StakePosition},
};

#[derive(Debug, Clone, Default)]
pub struct StakePositionLedger {
    /// `snapshots[n - 1]` holds nonce `n`
    snapshots: Vec<StakePosition>,
    /// Nonces each owner currently holds
    holdings: HashMap<Pubkey, BTreeSet<u64>>,
    /// old nonce → nonce that replaced it
    successors: HashMap<u64, u64>,
}

impl StakePositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nonce the next `mint` will return.
    pub fn next_nonce(&self) -> u64 {
        self.snapshots.len() as u64 + 1
    }

    pub fn mint(&mut self, owner: Pubkey, attributes: StakeAttributes) -> u64 {
        let nonce = self.next_nonce();
        self.snapshots.push(StakePosition { owner, nonce, attributes });
        self.holdings.entry(owner).or_default().insert(nonce);
        nonce
    }

    /// Replace `nonce` (held by `owner`) with a fresh snapshot.
    pub fn supersede(
        &mut self,
        owner: &Pubkey,
        nonce: u64,
        attributes: StakeAttributes,
    ) -> Result<u64> {
        self.get(owner, nonce)?;
        if let Some(held) = self.holdings.get_mut(owner) {
            held.remove(&nonce);
        }
        let successor = self.mint(*owner, attributes);
        self.successors.insert(nonce, successor);
        Ok(successor)
    }

    /// The snapshot at `nonce`, provided `owner` currently holds it.
    pub fn get(&self, owner: &Pubkey, nonce: u64) -> Result<&StakePosition> {
        let position = self.snapshot(nonce).ok_or(ExchangeError::PositionNotFound(nonce))?;
        if !self.holds(owner, nonce) {
            return Err(ExchangeError::Unauthorized { owner: *owner, nonce });
        }
        Ok(position)
    }

    pub fn holds(&self, owner: &Pubkey, nonce: u64) -> bool {
        self.holdings
            .get(owner)
            .is_some_and(|held| held.contains(&nonce))
    }

    /// Any snapshot ever written, current or superseded.
    pub fn snapshot(&self, nonce: u64) -> Option<&StakePosition> {
        let index = usize::try_from(nonce.checked_sub(1)?).ok()?;
        self.snapshots.get(index)
    }

    pub fn successor(&self, nonce: u64) -> Option<u64> {
        self.successors.get(&nonce).copied()
    }

    /// `nonce` followed by every snapshot that superseded it, oldest first.
    pub fn lineage(&self, nonce: u64) -> Vec<&StakePosition> {
        let mut chain = Vec::new();
        let mut cursor = Some(nonce);
        while let Some(current) = cursor {
            match self.snapshot(current) {
                Some(position) => chain.push(position),
                None => break,
            }
            cursor = self.successor(current);
        }
        chain
    }

    /// Positions `owner` currently holds, ascending by nonce.
    pub fn positions_of(&self, owner: &Pubkey) -> Vec<&StakePosition> {
        self.holdings
            .get(owner)
            .map(|held| held.iter().filter_map(|&n| self.snapshot(n)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
