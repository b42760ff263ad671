//! Pair registry: one pool per unordered token pair, at an address anyone can
//! compute before the pool exists.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::POOL_SEED,
    error::{ExchangeError, Result},
    state::Pool,
};

/// Order two token identities ascending.
pub fn sort_tokens(token_a: Pubkey, token_b: Pubkey) -> Result<(Pubkey, Pubkey)> {
    if token_a == token_b {
        return Err(ExchangeError::IdenticalTokens);
    }
    Ok(if token_a < token_b { (token_a, token_b) } else { (token_b, token_a) })
}

/// Derive the pool address for a pair, in either order.
///
/// `sha256(b"pool" ‖ token0 ‖ token1 ‖ implementation ‖ bump ‖ registry ‖ "ProgramDerivedAddress")`
/// with the highest bump that lands off the ed25519 curve.
pub fn derive_pool_address(
    registry_id: &Pubkey,
    token_a: &Pubkey,
    token_b: &Pubkey,
    implementation: &Pubkey,
) -> Result<(Pubkey, u8)> {
    let (token0, token1) = sort_tokens(*token_a, *token_b)?;
    Ok(Pubkey::find_program_address(
        &[POOL_SEED, token0.as_ref(), token1.as_ref(), implementation.as_ref()],
        registry_id,
    ))
}

#[derive(Debug, Clone)]
pub struct PairRegistry {
    registry_id: Pubkey,
    implementation: Pubkey,
    /// Insertion order; never reordered or compacted
    pools: Vec<Pool>,
    /// (token0, token1) → index into `pools`
    by_pair: HashMap<(Pubkey, Pubkey), usize>,
    /// pool address → index into `pools`
    by_address: HashMap<Pubkey, usize>,
}

impl PairRegistry {
    pub fn new(registry_id: Pubkey, implementation: Pubkey) -> Self {
        Self {
            registry_id,
            implementation,
            pools: Vec::new(),
            by_pair: HashMap::new(),
            by_address: HashMap::new(),
        }
    }

    pub fn registry_id(&self) -> &Pubkey {
        &self.registry_id
    }

    pub fn implementation(&self) -> &Pubkey {
        &self.implementation
    }

    /// Record a new pool for the pair. Fails with `PairExists` for a pair
    /// already registered in either order.
    pub fn create_pair(&mut self, token_a: Pubkey, token_b: Pubkey) -> Result<Pool> {
        let key = sort_tokens(token_a, token_b)?;
        if self.by_pair.contains_key(&key) {
            return Err(ExchangeError::PairExists(key.0, key.1));
        }

        let (address, bump) =
            derive_pool_address(&self.registry_id, &key.0, &key.1, &self.implementation)?;
        let pool = Pool {
            token0: key.0,
            token1: key.1,
            address,
            bump,
            index: self.pools.len() as u64,
        };

        let slot = self.pools.len();
        self.pools.push(pool.clone());
        self.by_pair.insert(key, slot);
        self.by_address.insert(address, slot);
        Ok(pool)
    }

    pub fn get_pair(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<Pubkey> {
        self.pair(token_a, token_b).map(|pool| pool.address)
    }

    /// Full catalogue entry for a pair, in either order.
    pub fn pair(&self, token_a: &Pubkey, token_b: &Pubkey) -> Option<&Pool> {
        let key = sort_tokens(*token_a, *token_b).ok()?;
        self.by_pair.get(&key).map(|&slot| &self.pools[slot])
    }

    pub fn pool(&self, address: &Pubkey) -> Option<&Pool> {
        self.by_address.get(address).map(|&slot| &self.pools[slot])
    }

    pub fn all_pairs_length(&self) -> u64 {
        self.pools.len() as u64
    }

    pub fn all_pairs(&self, index: u64) -> Option<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.pools.get(i))
            .map(|pool| pool.address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pool> {
        self.pools.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PairRegistry {
        PairRegistry::new(Pubkey::new_unique(), Pubkey::new_unique())
    }

    #[test]
    fn sorts_pair_and_looks_up_symmetrically() {
        let mut reg = registry();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let pool = reg.create_pair(b, a).unwrap();

        assert!(pool.token0 < pool.token1);
        assert_eq!(reg.get_pair(&a, &b), Some(pool.address));
        assert_eq!(reg.get_pair(&b, &a), Some(pool.address));
        assert_eq!(reg.pool(&pool.address), Some(&pool));
    }

    #[test]
    fn duplicate_rejected_in_both_orders() {
        let mut reg = registry();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        reg.create_pair(a, b).unwrap();

        assert!(matches!(reg.create_pair(a, b), Err(ExchangeError::PairExists(..))));
        assert!(matches!(reg.create_pair(b, a), Err(ExchangeError::PairExists(..))));
        assert_eq!(reg.all_pairs_length(), 1);
    }

    #[test]
    fn identical_tokens_rejected() {
        let mut reg = registry();
        let a = Pubkey::new_unique();
        assert_eq!(reg.create_pair(a, a), Err(ExchangeError::IdenticalTokens));
        assert_eq!(reg.get_pair(&a, &a), None);
    }

    #[test]
    fn address_matches_precomputation() {
        let mut reg = registry();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let expected =
            derive_pool_address(reg.registry_id(), &a, &b, reg.implementation()).unwrap();
        let pool = reg.create_pair(a, b).unwrap();
        assert_eq!((pool.address, pool.bump), expected);
    }

    #[test]
    fn address_depends_on_implementation_and_registry() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (registry, implementation) = (Pubkey::new_unique(), Pubkey::new_unique());
        let base = derive_pool_address(&registry, &a, &b, &implementation).unwrap();

        assert_ne!(base, derive_pool_address(&registry, &a, &b, &Pubkey::new_unique()).unwrap());
        assert_ne!(
            base,
            derive_pool_address(&Pubkey::new_unique(), &a, &b, &implementation).unwrap()
        );
    }

    #[test]
    fn enumeration_keeps_insertion_order() {
        let mut reg = registry();
        let created: Vec<Pubkey> = (0..4)
            .map(|_| {
                reg.create_pair(Pubkey::new_unique(), Pubkey::new_unique())
                    .unwrap()
                    .address
            })
            .collect();

        assert_eq!(reg.all_pairs_length(), 4);
        for (i, address) in created.iter().enumerate() {
            assert_eq!(reg.all_pairs(i as u64), Some(*address));
        }
        assert_eq!(reg.all_pairs(4), None);
    }
}
