use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum LedgerEvent {
    #[event_version("1.0.0")]
    TokenMinted { token_id: u64, recipient: AccountId, price: U128 },
    #[event_version("1.0.0")]
    TokenTransferred { token_id: u64, old_owner: AccountId, new_owner: AccountId },
    #[event_version("1.0.0")]
    RoyaltyRecipientUpdated { token_id: u64, old_recipient: AccountId, new_recipient: AccountId },
    #[event_version("1.0.0")]
    RoyaltyPaid { token_id: u64, payer: AccountId, recipient: AccountId, royalty_amount: U128, remainder: U128 },
    #[event_version("1.0.0")]
    LedgerPaused { administrator: AccountId },
    #[event_version("1.0.0")]
    LedgerUnpaused { administrator: AccountId },
    #[event_version("1.0.0")]
    DistributionTargetUpdated { old_target: AccountId, new_target: AccountId },
    #[event_version("1.0.0")]
    MintReverted { token_id: u64, payer: AccountId, refund: U128 },
    #[event_version("1.0.0")]
    DistributionRefunded { token_id: u64, payer: AccountId, amount: U128 },
    #[event_version("1.0.0")]
    StateMigrated { old_version: String, new_version: String },
}
