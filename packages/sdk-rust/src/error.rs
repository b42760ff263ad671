//! SDK error type.

/// All errors returned by the Gainz Swap SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Pool discovery ───────────────────────────────────────────────────────
    /// A pair needs two distinct tokens.
    #[error("A pair needs two distinct tokens")]
    IdenticalTokens,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in reward math")]
    MathOverflow,

    // ── Record parsing ───────────────────────────────────────────────────────
    /// Raw event bytes could not be deserialized.
    #[error("Record parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
