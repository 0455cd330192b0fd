use revm::primitives::U256;

/// Platform fee charged from the second registration on: 0.001 ether.
pub const DEFAULT_PLATFORM_FEE_WEI: u64 = 1_000_000_000_000_000;

pub fn default_platform_fee() -> U256 {
    U256::from(DEFAULT_PLATFORM_FEE_WEI)
}

/// Environment variable naming the treasury that receives fees.
pub const ENV_TREASURY_ADDRESS: &str = "TREASURY_ADDRESS";

/// Environment variable overriding the platform fee, in wei.
pub const ENV_PLATFORM_FEE_WEI: &str = "PLATFORM_FEE_WEI";

/// Revision given to the first registration of a root.
pub const FIRST_REVISION: u32 = 1;
