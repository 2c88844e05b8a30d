use near_sdk::Gas;

/// Royalty owed to the token's royalty recipient on resale settlement.
pub const ROYALTY_RATE_BPS: u16 = 500; // 5%
pub const BASIS_POINTS: u16 = 10_000; // 100%

/// Tag forwarded to the distribution sink with every value notification.
pub const ASSET_TYPE_SITE: &str = "site";

/// Protocol-reserved account used as the burn/invalid sentinel; nothing may
/// be minted to or transferred to it.
pub const INVALID_RECIPIENT_ID: &str = "system";

pub const MAX_METADATA_LEN: usize = 1_024;
pub const MAX_URI_LEN: usize = 2_048;

/// Supply cap applied when migrating state that predates the cap field.
pub const DEFAULT_MAX_SUPPLY: u64 = 10_000;

pub const GAS_DISTRIBUTION_NOTIFY: Gas = Gas::from_tgas(30);
pub const GAS_RESOLVE_DISTRIBUTION: Gas = Gas::from_tgas(20);
