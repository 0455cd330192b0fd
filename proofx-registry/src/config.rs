//! Registry deployment configuration.
//!
//! A registry is deployed by an owner who may later change the platform fee
//! and the treasury. Defaults follow the reference deployment:
//! - `treasury`: the owner's own address
//! - `platform_fee`: 0.001 ether
//!
//! # Usage Examples
//! ```no_run
//! use proofx_registry::config::RegistryConfig;
//! use revm::primitives::{Address, U256};
//!
//! let owner = Address::repeat_byte(1);
//! let config = RegistryConfig::new(owner)
//!     .with_treasury(Address::repeat_byte(2))
//!     .with_platform_fee(U256::from(10u64));
//!
//! // or from TREASURY_ADDRESS / PLATFORM_FEE_WEI
//! let config = RegistryConfig::from_env(owner).unwrap();
//! ```

use std::env;
use std::str::FromStr;

use revm::primitives::{Address, U256};

use crate::def::{default_platform_fee, ENV_PLATFORM_FEE_WEI, ENV_TREASURY_ADDRESS};
use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub owner: Address,
    pub treasury: Address,
    pub platform_fee: U256,
}

impl RegistryConfig {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            treasury: owner,
            platform_fee: default_platform_fee(),
        }
    }

    pub fn with_treasury(mut self, treasury: Address) -> Self {
        self.treasury = treasury;
        self
    }

    pub fn with_platform_fee(mut self, platform_fee: U256) -> Self {
        self.platform_fee = platform_fee;
        self
    }

    /// Builds a config for `owner`, overriding defaults from the environment.
    ///
    /// Unset or empty variables keep the default; set but unparsable ones
    /// are an `InvalidInput` error.
    pub fn from_env(owner: Address) -> Result<Self, RegistryError> {
        let mut config = Self::new(owner);
        if let Some(v) = non_empty_var(ENV_TREASURY_ADDRESS) {
            config.treasury = Address::from_str(&v).map_err(|e| {
                RegistryError::InvalidInput(format!("{}={:?}: {}", ENV_TREASURY_ADDRESS, v, e))
            })?;
        }
        if let Some(v) = non_empty_var(ENV_PLATFORM_FEE_WEI) {
            config.platform_fee = U256::from_str(&v).map_err(|e| {
                RegistryError::InvalidInput(format!("{}={:?}: {}", ENV_PLATFORM_FEE_WEI, v, e))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.owner.is_zero() {
            return Err(RegistryError::InvalidInput("owner is the zero address".to_owned()));
        }
        if self.treasury.is_zero() {
            return Err(RegistryError::InvalidInput(
                "treasury is the zero address".to_owned(),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let owner = Address::repeat_byte(9);
        let config = RegistryConfig::new(owner);
        assert_eq!(config.treasury, owner);
        assert_eq!(config.platform_fee, default_platform_fee());
        assert!(config.validate().is_ok());
        assert!(RegistryConfig::new(Address::ZERO).validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        let owner = Address::repeat_byte(9);
        env::set_var(ENV_TREASURY_ADDRESS, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        env::set_var(ENV_PLATFORM_FEE_WEI, "2500");
        let config = RegistryConfig::from_env(owner).unwrap();
        assert_eq!(
            config.treasury,
            Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap()
        );
        assert_eq!(config.platform_fee, U256::from(2500u64));

        env::set_var(ENV_PLATFORM_FEE_WEI, "lots");
        assert!(matches!(
            RegistryConfig::from_env(owner),
            Err(RegistryError::InvalidInput(_))
        ));

        env::remove_var(ENV_TREASURY_ADDRESS);
        env::remove_var(ENV_PLATFORM_FEE_WEI);
        assert_eq!(RegistryConfig::from_env(owner).unwrap(), RegistryConfig::new(owner));
    }
}
