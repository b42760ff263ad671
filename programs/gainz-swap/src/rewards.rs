//! Epoch-based stake and reward accounting.
//!
//! Holds the global reward-per-share accumulator and total stake weight, and
//! owns the position ledger. Token movement is the caller's job: this type
//! only answers "how much" and records the outcome.

use ethnum::U256;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    error::{ExchangeError, Result},
    instructions::reward_math::{pending_reward, reward_per_share_delta, stake_weight},
    ledger::StakePositionLedger,
    state::{GlobalRewardState, LpDetail, StakeAttributes, StakePosition},
};

/// Outcome of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub amount: u128,
    pub new_nonce: u64,
}

#[derive(Debug, Clone)]
pub struct RewardAccountingEngine {
    min_epochs_locked: u64,
    max_epochs_locked: u64,
    state: GlobalRewardState,
    ledger: StakePositionLedger,
}

impl RewardAccountingEngine {
    pub fn new(min_epochs_locked: u64, max_epochs_locked: u64) -> Self {
        Self {
            min_epochs_locked,
            max_epochs_locked,
            state: GlobalRewardState::default(),
            ledger: StakePositionLedger::new(),
        }
    }

    pub fn state(&self) -> &GlobalRewardState {
        &self.state
    }

    pub fn ledger(&self) -> &StakePositionLedger {
        &self.ledger
    }

    pub fn reward_per_share(&self) -> U256 {
        self.state.reward_per_share
    }

    /// Open a position for `lp_details`, snapshotting the current accumulator.
    pub fn stake(
        &mut self,
        owner: Pubkey,
        epoch: u64,
        epochs_locked: u64,
        lp_details: Vec<LpDetail>,
    ) -> Result<u64> {
        if epochs_locked < self.min_epochs_locked || epochs_locked > self.max_epochs_locked {
            return Err(ExchangeError::InvalidLockPeriod {
                epochs: epochs_locked,
                min: self.min_epochs_locked,
                max: self.max_epochs_locked,
            });
        }

        let mut attributes = StakeAttributes {
            reward_per_share: self.state.reward_per_share,
            epoch_staked: epoch,
            epochs_locked,
            stake_weight: 0,
            lp_details,
        };
        let value = attributes
            .total_liquidity_value()
            .ok_or(ExchangeError::MathOverflow)?;
        if value == 0 {
            return Err(ExchangeError::InvalidPayment("staked liquidity has no value"));
        }
        attributes.stake_weight = stake_weight(value, epochs_locked)?;

        self.state.total_stake_weight = self
            .state
            .total_stake_weight
            .checked_add(attributes.stake_weight)
            .ok_or(ExchangeError::MathOverflow)?;

        debug!(
            "stake weight={} value={} epochs_locked={} total_weight={}",
            attributes.stake_weight, value, epochs_locked, self.state.total_stake_weight
        );
        Ok(self.ledger.mint(owner, attributes))
    }

    /// Account for `amount` reward tokens entering the reserve.
    pub fn update_reward_reserve(&mut self, amount: u128) -> Result<()> {
        if amount == 0 {
            return Err(ExchangeError::InvalidPayment("reward amount must be positive"));
        }
        let state = &mut self.state;
        state.reserve = state
            .reserve
            .checked_add(amount)
            .ok_or(ExchangeError::MathOverflow)?;

        let distributable = state
            .undistributed
            .checked_add(amount)
            .ok_or(ExchangeError::MathOverflow)?;

        if state.total_stake_weight == 0 {
            // Held until some weight exists to share it.
            state.undistributed = distributable;
            return Ok(());
        }

        let delta = reward_per_share_delta(distributable, state.total_stake_weight)?;
        state.reward_per_share = state
            .reward_per_share
            .checked_add(delta)
            .ok_or(ExchangeError::MathOverflow)?;
        state.undistributed = 0;
        Ok(())
    }

    pub fn pending_rewards(&self, owner: &Pubkey, nonce: u64) -> Result<u128> {
        let position = self.ledger.get(owner, nonce)?;
        pending_reward(
            self.state.reward_per_share,
            position.attributes.reward_per_share,
            position.attributes.stake_weight,
        )
    }

    /// Settle what `nonce` has accrued and supersede it with a snapshot taken
    /// at the current accumulator.
    pub fn claim(&mut self, owner: &Pubkey, nonce: u64) -> Result<Claim> {
        let owed = self.pending_rewards(owner, nonce)?;
        if owed == 0 {
            return Err(ExchangeError::NothingToClaim(nonce));
        }

        let payable = self
            .state
            .reserve
            .checked_sub(self.state.undistributed)
            .ok_or(ExchangeError::MathOverflow)?;
        if owed > payable {
            return Err(ExchangeError::ReserveUnderflow { owed, reserve: payable });
        }
        self.state.reserve -= owed;

        let mut attributes = self.ledger.get(owner, nonce)?.attributes.clone();
        attributes.reward_per_share = self.state.reward_per_share;
        let new_nonce = self.ledger.supersede(owner, nonce, attributes)?;

        Ok(Claim { amount: owed, new_nonce })
    }

    pub fn position(&self, owner: &Pubkey, nonce: u64) -> Result<&StakePosition> {
        self.ledger.get(owner, nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn lp(value: u128) -> Vec<LpDetail> {
        vec![LpDetail {
            pool: Pubkey::new_unique(),
            token0: Pubkey::new_unique(),
            token1: Pubkey::new_unique(),
            liquidity: value,
            liquidity_value: value,
        }]
    }

    #[test]
    fn stake_snapshots_current_accumulator() {
        let mut engine = RewardAccountingEngine::new(0, 1080);
        let alice = Pubkey::new_unique();
        let first = engine.stake(alice, 0, 10, lp(E18)).unwrap();
        engine.update_reward_reserve(E18).unwrap();

        let bob = Pubkey::new_unique();
        let second = engine.stake(bob, 2, 10, lp(E18)).unwrap();

        assert_eq!(engine.position(&alice, first).unwrap().attributes.reward_per_share, U256::ZERO);
        assert_eq!(
            engine.position(&bob, second).unwrap().attributes.reward_per_share,
            engine.reward_per_share()
        );
        assert_eq!(engine.pending_rewards(&bob, second).unwrap(), 0);
    }

    #[test]
    fn lock_outside_bounds_rejected() {
        let mut engine = RewardAccountingEngine::new(7, 30);
        let owner = Pubkey::new_unique();
        assert!(matches!(
            engine.stake(owner, 0, 6, lp(1)),
            Err(ExchangeError::InvalidLockPeriod { epochs: 6, .. })
        ));
        assert!(matches!(
            engine.stake(owner, 0, 31, lp(1)),
            Err(ExchangeError::InvalidLockPeriod { epochs: 31, .. })
        ));
        assert_eq!(engine.state().total_stake_weight, 0);
    }

    #[test]
    fn valueless_stake_rejected() {
        let mut engine = RewardAccountingEngine::new(0, 30);
        assert!(matches!(
            engine.stake(Pubkey::new_unique(), 0, 5, lp(0)),
            Err(ExchangeError::InvalidPayment(_))
        ));
    }

    #[test]
    fn donation_without_weight_waits_for_next_top_up() {
        let mut engine = RewardAccountingEngine::new(0, 1080);
        engine.update_reward_reserve(500).unwrap();
        assert_eq!(engine.reward_per_share(), U256::ZERO);
        assert_eq!(engine.state().undistributed, 500);

        let owner = Pubkey::new_unique();
        let nonce = engine.stake(owner, 0, 0, lp(10)).unwrap();
        assert_eq!(engine.pending_rewards(&owner, nonce).unwrap(), 0);

        engine.update_reward_reserve(500).unwrap();
        assert_eq!(engine.state().undistributed, 0);
        assert_eq!(engine.state().reserve, 1000);
        assert_eq!(engine.claim(&owner, nonce).unwrap().amount, 1000);
    }

    #[test]
    fn claim_beyond_reserve_fails_without_superseding() {
        let mut engine = RewardAccountingEngine::new(0, 1080);
        let owner = Pubkey::new_unique();
        let nonce = engine.stake(owner, 0, 0, lp(100)).unwrap();
        engine.update_reward_reserve(1_000).unwrap();
        assert_eq!(engine.pending_rewards(&owner, nonce).unwrap(), 1_000);
        engine.state.reserve = 999;

        assert_eq!(
            engine.claim(&owner, nonce),
            Err(ExchangeError::ReserveUnderflow { owed: 1_000, reserve: 999 })
        );
        assert_eq!(engine.state().reserve, 999);
        assert_eq!(engine.ledger().next_nonce(), nonce + 1);
        assert!(engine.position(&owner, nonce).is_ok());
    }

    #[test]
    fn undistributed_above_reserve_is_overflow() {
        let mut engine = RewardAccountingEngine::new(0, 1080);
        let owner = Pubkey::new_unique();
        let nonce = engine.stake(owner, 0, 0, lp(100)).unwrap();
        engine.update_reward_reserve(1_000).unwrap();
        engine.state.undistributed = 2_000;

        assert_eq!(engine.claim(&owner, nonce), Err(ExchangeError::MathOverflow));
        assert_eq!(engine.state().reserve, 1_000);
        assert_eq!(engine.ledger().next_nonce(), nonce + 1);
    }

    #[test]
    fn claim_supersedes_and_second_claim_has_nothing() {
        let mut engine = RewardAccountingEngine::new(0, 1080);
        let owner = Pubkey::new_unique();
        let nonce = engine.stake(owner, 0, 1080, lp(5 * E18 / 100)).unwrap();
        engine.update_reward_reserve(2 * E18 / 100).unwrap();

        let claim = engine.claim(&owner, nonce).unwrap();
        assert_eq!(claim.new_nonce, nonce + 1);
        assert!(2 * E18 / 100 - claim.amount <= 1);

        let successor = engine.position(&owner, claim.new_nonce).unwrap();
        assert_eq!(successor.attributes.reward_per_share, engine.reward_per_share());
        let original = engine.ledger().snapshot(nonce).unwrap();
        assert_eq!(successor.attributes.stake_weight, original.attributes.stake_weight);
        assert_eq!(successor.attributes.lp_details, original.attributes.lp_details);

        assert_eq!(
            engine.claim(&owner, claim.new_nonce),
            Err(ExchangeError::NothingToClaim(claim.new_nonce))
        );
        assert!(matches!(engine.claim(&owner, nonce), Err(ExchangeError::Unauthorized { .. })));
    }

    #[test]
    fn claim_keeps_total_weight() {
        let mut engine = RewardAccountingEngine::new(0, 100);
        let owner = Pubkey::new_unique();
        let nonce = engine.stake(owner, 0, 4, lp(100)).unwrap();
        let weight = engine.state().total_stake_weight;
        engine.update_reward_reserve(1_000).unwrap();
        engine.claim(&owner, nonce).unwrap();
        assert_eq!(engine.state().total_stake_weight, weight);
    }

    #[test]
    fn rewards_split_by_weight() {
        let mut engine = RewardAccountingEngine::new(0, 100);
        let (short, long) = (Pubkey::new_unique(), Pubkey::new_unique());
        let a = engine.stake(short, 0, 0, lp(100)).unwrap();
        let b = engine.stake(long, 0, 2, lp(100)).unwrap();
        engine.update_reward_reserve(4_000).unwrap();

        assert_eq!(engine.claim(&short, a).unwrap().amount, 1_000);
        assert_eq!(engine.claim(&long, b).unwrap().amount, 3_000);
        assert_eq!(engine.state().reserve, 0);
    }
}
