use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub enum LedgerError {
    Unauthorized,
    Paused,
    InvalidAmount,
    InvalidTokenId,
    /// Reserved for identifier-reuse policies; unreachable while identifiers
    /// are assigned sequentially.
    AlreadyMinted,
    NotOwner,
    InvalidMetadata,
    InvalidRecipient,
}

impl FunctionError for LedgerError {
    fn panic(&self) -> ! {
        env::panic_str(match self {
            LedgerError::Unauthorized => "Unauthorized access",
            LedgerError::Paused => "Ledger is paused",
            LedgerError::InvalidAmount => "Invalid amount",
            LedgerError::InvalidTokenId => "Invalid token ID",
            LedgerError::AlreadyMinted => "Token already minted",
            LedgerError::NotOwner => "Caller does not own this token",
            LedgerError::InvalidMetadata => "Invalid metadata",
            LedgerError::InvalidRecipient => "Invalid recipient",
        })
    }
}
