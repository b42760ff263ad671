//! Exchange configuration.
//!
//! Loaded from JSON; keys are written as base58 strings.
//!
//! ```json
//! {
//!   "registry_id": "…",
//!   "pool_implementation": "…",
//!   "wrapped_native": "So11111111111111111111111111111111111111112",
//!   "reward_token": "…",
//!   "custody": "…",
//!   "min_epochs_locked": 0,
//!   "max_epochs_locked": 1080
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::*,
    error::{ExchangeError, Result},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Identity of the registry; the program id pool addresses derive from.
    #[serde(with = "pubkey_str")]
    pub registry_id: Pubkey,
    /// Identity of the implementation every pool instance shares.
    #[serde(with = "pubkey_str")]
    pub pool_implementation: Pubkey,
    /// Token that native-coin payments are normalized to.
    #[serde(with = "pubkey_str")]
    pub wrapped_native: Pubkey,
    /// Asset paid out by `claim_rewards` and pulled in by reserve top-ups.
    #[serde(with = "pubkey_str")]
    pub reward_token: Pubkey,
    /// Account holding escrowed payments, staked liquidity and the reserve.
    #[serde(with = "pubkey_str")]
    pub custody: Pubkey,
    #[serde(default = "default_min_epochs")]
    pub min_epochs_locked: u64,
    #[serde(default = "default_max_epochs")]
    pub max_epochs_locked: u64,
}

fn default_min_epochs() -> u64 {
    MIN_EPOCHS_LOCK_DEFAULT
}

fn default_max_epochs() -> u64 {
    MAX_EPOCHS_LOCK_DEFAULT
}

impl ExchangeConfig {
    /// Config with default lock bounds.
    pub fn new(
        registry_id: Pubkey,
        pool_implementation: Pubkey,
        wrapped_native: Pubkey,
        reward_token: Pubkey,
        custody: Pubkey,
    ) -> Self {
        Self {
            registry_id,
            pool_implementation,
            wrapped_native,
            reward_token,
            custody,
            min_epochs_locked: MIN_EPOCHS_LOCK_DEFAULT,
            max_epochs_locked: MAX_EPOCHS_LOCK_DEFAULT,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ExchangeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExchangeError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_epochs_locked > self.max_epochs_locked {
            return Err(ExchangeError::InvalidConfig(format!(
                "min_epochs_locked {} exceeds max_epochs_locked {}",
                self.min_epochs_locked, self.max_epochs_locked
            )));
        }
        if self.wrapped_native == NATIVE_TOKEN {
            return Err(ExchangeError::InvalidConfig(
                "wrapped_native cannot be the native sentinel".into(),
            ));
        }
        if self.reward_token == NATIVE_TOKEN {
            return Err(ExchangeError::InvalidConfig(
                "reward_token must be a concrete token".into(),
            ));
        }
        Ok(())
    }

    /// Map the native sentinel onto the wrapped-native token.
    pub fn normalize(&self, token: Pubkey) -> Pubkey {
        if token == NATIVE_TOKEN {
            self.wrapped_native
        } else {
            token
        }
    }
}

mod pubkey_str {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&key.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Pubkey, D::Error> {
        let raw = String::deserialize(d)?;
        Pubkey::from_str(&raw).map_err(|e| D::Error::custom(format!("{raw}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExchangeConfig {
        ExchangeConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        )
    }

    #[test]
    fn json_uses_base58_keys_and_default_bounds() {
        let config = sample();
        let json = format!(
            r#"{{"registry_id":"{}","pool_implementation":"{}","wrapped_native":"{}","reward_token":"{}","custody":"{}"}}"#,
            config.registry_id,
            config.pool_implementation,
            config.wrapped_native,
            config.reward_token,
            config.custody
        );
        let parsed = ExchangeConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.max_epochs_locked, 1080);
    }

    #[test]
    fn rejects_inverted_lock_bounds() {
        let mut config = sample();
        config.min_epochs_locked = 10;
        config.max_epochs_locked = 5;
        assert!(matches!(config.validate(), Err(ExchangeError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_native_sentinel_as_wrapped_token() {
        let mut config = sample();
        config.wrapped_native = NATIVE_TOKEN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_key() {
        let err = ExchangeConfig::from_json_str(
            r#"{"registry_id":"not-a-key","pool_implementation":"","wrapped_native":"","reward_token":"","custody":""}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidConfig(_)));
    }

    #[test]
    fn normalizes_only_the_native_sentinel() {
        let config = sample();
        let token = Pubkey::new_unique();
        assert_eq!(config.normalize(NATIVE_TOKEN), config.wrapped_native);
        assert_eq!(config.normalize(token), token);
    }
}
