#![allow(dead_code)]

use gainz_swap::{
    AssetLedger, ExchangeConfig, MemoryExchange, Pool, Result, TokenPayment, NATIVE_TOKEN,
};
use solana_sdk::pubkey::Pubkey;

pub const E18: u128 = 1_000_000_000_000_000_000;
pub const E8: u128 = 100_000_000;

/// Exchange wired to in-memory collaborators plus the identities it uses.
pub struct Fixture {
    pub ex: MemoryExchange,
    pub registry: Pubkey,
    pub implementation: Pubkey,
    pub wrapped: Pubkey,
    pub token_b: Pubkey,
    pub reward: Pubkey,
    pub custody: Pubkey,
}

impl Fixture {
    /// Built through the JSON loader, the way a deployment would configure it.
    pub fn new() -> Self {
        let registry = Pubkey::new_unique();
        let implementation = Pubkey::new_unique();
        let wrapped = Pubkey::new_unique();
        let token_b = Pubkey::new_unique();
        let reward = Pubkey::new_unique();
        let custody = Pubkey::new_unique();

        let json = format!(
            r#"{{
                "registry_id": "{registry}",
                "pool_implementation": "{implementation}",
                "wrapped_native": "{wrapped}",
                "reward_token": "{reward}",
                "custody": "{custody}",
                "min_epochs_locked": 0,
                "max_epochs_locked": 1080
            }}"#
        );
        let config = ExchangeConfig::from_json_str(&json).unwrap();
        let ex = MemoryExchange::in_memory(config).unwrap();

        Self { ex, registry, implementation, wrapped, token_b, reward, custody }
    }

    pub fn fund(&mut self, token: &Pubkey, owner: &Pubkey, amount: u128) {
        self.ex.assets_mut().mint(token, owner, amount);
    }

    pub fn fund_wrapped(&mut self, owner: &Pubkey, amount: u128) {
        let token = self.wrapped;
        self.fund(&token, owner, amount);
    }

    pub fn fund_token_b(&mut self, owner: &Pubkey, amount: u128) {
        let token = self.token_b;
        self.fund(&token, owner, amount);
    }

    pub fn balance(&self, token: &Pubkey, owner: &Pubkey) -> u128 {
        self.ex.assets().balance_of(token, 0, owner)
    }

    /// Seed the wrapped-native / token_b pool with 1000 native and 10 token_b.
    pub fn seed_pair(&mut self, provider: &Pubkey) -> Pool {
        self.fund_wrapped(provider, 1_000 * E18);
        self.fund_token_b(provider, 10 * E8);
        self.ex
            .create_pair(
                provider,
                TokenPayment::new(NATIVE_TOKEN, 1_000 * E18),
                TokenPayment::new(self.token_b, 10 * E8),
                1_000 * E18,
            )
            .unwrap()
    }

    /// Paths zapping native into the seeded pool: leg 0 keeps wrapped
    /// native, leg 1 swaps it into token_b.
    pub fn native_paths(&self) -> Vec<Vec<Pubkey>> {
        vec![vec![self.wrapped], vec![self.wrapped, self.token_b], vec![]]
    }

    pub fn stake_native(&mut self, owner: &Pubkey, amount: u128, epochs_locked: u64) -> Result<u64> {
        let paths = self.native_paths();
        self.ex.stake(
            owner,
            TokenPayment::new(NATIVE_TOKEN, amount),
            epochs_locked,
            &paths,
            0,
            0,
            amount,
        )
    }

    pub fn donate(&mut self, donor: &Pubkey, amount: u128) -> Result<()> {
        let reward = self.reward;
        self.fund(&reward, donor, amount);
        self.ex.update_reward_reserve(donor, amount)
    }
}
