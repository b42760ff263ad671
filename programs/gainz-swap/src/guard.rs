use crate::error::{ExchangeError, Result};

/// Mutating entry points, each with its own reentrancy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    CreatePair,
    Stake,
    ClaimRewards,
    UpdateRewardReserve,
}

impl Entry {
    pub fn name(self) -> &'static str {
        match self {
            Entry::CreatePair => "create_pair",
            Entry::Stake => "stake",
            Entry::ClaimRewards => "claim_rewards",
            Entry::UpdateRewardReserve => "update_reward_reserve",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set on entry, cleared on exit, checked before entering.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryGuards {
    active: u8,
}

impl EntryGuards {
    pub fn enter(&mut self, entry: Entry) -> Result<()> {
        if self.is_active(entry) {
            return Err(ExchangeError::Reentrancy(entry.name()));
        }
        self.active |= entry.bit();
        Ok(())
    }

    pub fn exit(&mut self, entry: Entry) {
        self.active &= !entry.bit();
    }

    pub fn is_active(&self, entry: Entry) -> bool {
        self.active & entry.bit() != 0
    }
}
