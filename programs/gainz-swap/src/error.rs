use solana_sdk::pubkey::Pubkey;

/// Every failure an exchange operation can report. Any of them aborts the
/// whole operation and rolls back every side effect it had.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    // ── Pair registry ────────────────────────────────────────────────────────
    #[error("Pair already exists for {0} / {1}")]
    PairExists(Pubkey, Pubkey),

    #[error("Pair tokens must differ")]
    IdenticalTokens,

    #[error("No pair registered for {0} / {1}")]
    PairNotFound(Pubkey, Pubkey),

    // ── Payments and routing ─────────────────────────────────────────────────
    #[error("Invalid payment: {0}")]
    InvalidPayment(&'static str),

    #[error("Invalid routing path: {0}")]
    InvalidPath(&'static str),

    #[error("Deposit below minimum, slippage exceeded: realized={realized}, min={min}")]
    SlippageExceeded { realized: u128, min: u128 },

    // ── Staking ──────────────────────────────────────────────────────────────
    #[error("Lock of {epochs} epochs outside policy bounds {min}..={max}")]
    InvalidLockPeriod { epochs: u64, min: u64, max: u64 },

    #[error("Position {0} does not exist")]
    PositionNotFound(u64),

    #[error("{owner} does not hold position {nonce}")]
    Unauthorized { owner: Pubkey, nonce: u64 },

    #[error("Nothing to claim on position {0}")]
    NothingToClaim(u64),

    #[error("Reward reserve underflow: owed={owed}, reserve={reserve}")]
    ReserveUnderflow { owed: u128, reserve: u128 },

    #[error("No stake weight to distribute rewards over")]
    NoStakeWeight,

    // ── Execution ────────────────────────────────────────────────────────────
    #[error("Re-entrant call into {0}")]
    Reentrancy(&'static str),

    // ── Collaborators ────────────────────────────────────────────────────────
    #[error("Insufficient balance of {token} for {owner}: needed={needed}, available={available}")]
    InsufficientBalance {
        token: Pubkey,
        owner: Pubkey,
        needed: u128,
        available: u128,
    },

    #[error("Pool {0} has insufficient liquidity")]
    InsufficientLiquidity(Pubkey),

    #[error("Pool {0} is not initialized")]
    PoolNotInitialized(Pubkey),

    // ── Arithmetic / configuration ───────────────────────────────────────────
    #[error("Math overflow")]
    MathOverflow,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, ExchangeError>;
