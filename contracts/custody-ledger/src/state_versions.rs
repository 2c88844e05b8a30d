use crate::types::TokenRecord;
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::store::LookupMap;
use near_sdk::AccountId;

/// Ledger state before the supply cap became part of persisted state.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct StateV010 {
    pub version: String,
    pub administrator: AccountId,
    pub distribution_target: AccountId,
    pub paused: bool,
    pub last_token_id: u64,
    pub tokens: LookupMap<u64, TokenRecord>,
    pub token_uris: LookupMap<u64, String>,
}
