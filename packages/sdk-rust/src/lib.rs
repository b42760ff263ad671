//! Gainz Swap Rust SDK
//!
//! Client-side helpers for integrators of the Gainz Swap exchange: compute a
//! pair's pool address before it exists, decode the event records the
//! exchange emits, and preview rewards without touching exchange state.
//!
//! # Quick Start
//!
//! ```rust
//! use gainz_swap_sdk::{derive_pool_address, parse_record};
//! use solana_sdk::pubkey::Pubkey;
//!
//! let registry       = Pubkey::new_unique();
//! let implementation = Pubkey::new_unique();
//! let (wrapped, usdc) = (Pubkey::new_unique(), Pubkey::new_unique());
//!
//! let (pool, _bump) = derive_pool_address(&registry, &wrapped, &usdc, &implementation)?;
//! println!("pool will live at {}", pool);
//!
//! assert!(parse_record(&[]).is_err());
//! # Ok::<(), gainz_swap_sdk::Error>(())
//! ```
//!
//! # Feature Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`derive_pool_address`] | Pool address for a pair, either order |
//! | [`parse_record`] | Decode any emitted event record |
//! | [`math::pending_rewards`] | Rewards a position would claim now |

pub mod addresses;
pub mod error;
pub mod math;
pub mod records;

pub use addresses::{derive_pool_address, derive_pool_address_with_native, sort_tokens, NATIVE_TOKEN};
pub use error::{Error, Result};
pub use records::*;
