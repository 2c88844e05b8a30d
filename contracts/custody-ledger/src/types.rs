use near_sdk::{near, AccountId};

/// One custody record per minted token. `metadata` is immutable after mint;
/// `owner` and `royalty_recipient` are the only mutable fields.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct TokenRecord {
    pub owner: AccountId,
    pub metadata: String,
    pub royalty_recipient: AccountId,
    /// Confirms the record is fully initialized, never a partially
    /// constructed read.
    pub minted: bool,
}

/// Value legs of a royalty settlement, computed by the state layer and paid
/// out by the contract facade.
#[derive(Debug, PartialEq)]
pub struct RoyaltySettlement {
    pub royalty_recipient: AccountId,
    pub royalty_amount: u128,
    pub remainder: u128,
}
