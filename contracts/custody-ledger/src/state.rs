use crate::constants::{
    BASIS_POINTS, MAX_METADATA_LEN, MAX_URI_LEN, ROYALTY_RATE_BPS,
};
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::types::{RoyaltySettlement, TokenRecord};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{log, AccountId, BorshStorageKey};

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Tokens,
    TokenUris,
}

pub(crate) fn is_invalid_recipient(account_id: &AccountId) -> bool {
    account_id.as_str() == crate::constants::INVALID_RECIPIENT_ID
}

/// Authoritative custody state: token records, URIs, and the ledger-global
/// scalars. All mutating methods take the caller explicitly so authorization
/// is testable with arbitrary identities.
#[derive(BorshSerialize, BorshDeserialize, near_sdk_macros::NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct LedgerState {
    pub version: String,
    /// Fixed at construction; no transfer-of-admin operation exists.
    pub administrator: AccountId,
    pub distribution_target: AccountId,
    pub paused: bool,
    /// Highest identifier issued; identifiers are sequential from 1 and
    /// never reused, even when a mint is reverted.
    pub last_token_id: u64,
    pub max_supply: u64,
    pub tokens: LookupMap<u64, TokenRecord>,
    pub token_uris: LookupMap<u64, String>,
}

impl LedgerState {
    pub fn new(
        administrator: AccountId,
        distribution_target: AccountId,
        max_supply: u64,
    ) -> Result<Self, LedgerError> {
        if is_invalid_recipient(&administrator) || is_invalid_recipient(&distribution_target) {
            return Err(LedgerError::InvalidRecipient);
        }
        if max_supply == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            administrator,
            distribution_target,
            paused: false,
            last_token_id: 0,
            max_supply,
            tokens: LookupMap::new(StorageKey::Tokens),
            token_uris: LookupMap::new(StorageKey::TokenUris),
        })
    }

    /// Validates, takes payment (the attached deposit), and writes the token
    /// record. The distribution leg is fired by the facade after this
    /// returns; `revert_mint` is its compensation path.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        recipient: &AccountId,
        metadata: String,
        uri: String,
        price: u128,
        deposit: u128,
    ) -> Result<u64, LedgerError> {
        if caller != &self.administrator {
            return Err(LedgerError::Unauthorized);
        }
        if self.paused {
            return Err(LedgerError::Paused);
        }
        let token_id = self
            .last_token_id
            .checked_add(1)
            .ok_or(LedgerError::InvalidAmount)?;
        if token_id > self.max_supply {
            return Err(LedgerError::InvalidAmount);
        }
        if metadata.is_empty() || metadata.len() > MAX_METADATA_LEN {
            return Err(LedgerError::InvalidMetadata);
        }
        if uri.len() > MAX_URI_LEN {
            return Err(LedgerError::InvalidMetadata);
        }
        if is_invalid_recipient(recipient) {
            return Err(LedgerError::InvalidRecipient);
        }
        // The attached deposit is the payment; a mismatch aborts before any
        // state write.
        if deposit != price {
            return Err(LedgerError::InvalidAmount);
        }
        if self.tokens.contains_key(&token_id) {
            // Unreachable while identifiers are sequential; kept for
            // identifier-reuse policies.
            return Err(LedgerError::AlreadyMinted);
        }

        self.tokens.insert(
            token_id,
            TokenRecord {
                owner: recipient.clone(),
                metadata,
                royalty_recipient: recipient.clone(),
                minted: true,
            },
        );
        self.token_uris.insert(token_id, uri);
        self.last_token_id = token_id;

        LedgerEvent::TokenMinted {
            token_id,
            recipient: recipient.clone(),
            price: U128(price),
        }
        .emit();

        Ok(token_id)
    }

    /// Compensation for a failed distribution leg: removes the record and
    /// returns the amount to refund to the payer. `last_token_id` stays
    /// advanced; identifiers are never reused. Must not fail: custody may
    /// have changed during the callback window, in which case the revert is
    /// skipped and the price stays in ledger custody for operator follow-up.
    pub fn revert_mint(
        &mut self,
        token_id: u64,
        payer: &AccountId,
        recipient: &AccountId,
        price: u128,
    ) -> Option<u128> {
        let record = self.tokens.get(&token_id)?;
        if &record.owner != recipient {
            log!(
                "Skipping mint revert for token {}: custody changed during distribution window",
                token_id
            );
            return None;
        }

        self.tokens.remove(&token_id);
        self.token_uris.remove(&token_id);

        LedgerEvent::MintReverted {
            token_id,
            payer: payer.clone(),
            refund: U128(price),
        }
        .emit();

        Some(price)
    }

    pub fn transfer(
        &mut self,
        caller: &AccountId,
        sender: &AccountId,
        receiver: &AccountId,
        token_id: u64,
    ) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        // Third parties may not move tokens on another account's behalf.
        if caller != sender {
            return Err(LedgerError::Unauthorized);
        }
        let record = self
            .tokens
            .get_mut(&token_id)
            .ok_or(LedgerError::InvalidTokenId)?;
        if &record.owner != sender {
            return Err(LedgerError::NotOwner);
        }
        if is_invalid_recipient(receiver) {
            return Err(LedgerError::InvalidRecipient);
        }

        // Royalty recipient is untouched by custody changes.
        record.owner = receiver.clone();

        LedgerEvent::TokenTransferred {
            token_id,
            old_owner: sender.clone(),
            new_owner: receiver.clone(),
        }
        .emit();

        Ok(())
    }

    pub fn update_royalty_recipient(
        &mut self,
        caller: &AccountId,
        token_id: u64,
        new_recipient: &AccountId,
    ) -> Result<(), LedgerError> {
        let record = self
            .tokens
            .get_mut(&token_id)
            .ok_or(LedgerError::InvalidTokenId)?;
        if self.paused {
            return Err(LedgerError::Paused);
        }
        // Only the owner may redirect royalties, not the current recipient.
        if &record.owner != caller {
            return Err(LedgerError::Unauthorized);
        }
        if is_invalid_recipient(new_recipient) {
            return Err(LedgerError::InvalidRecipient);
        }

        let old_recipient = record.royalty_recipient.clone();
        record.royalty_recipient = new_recipient.clone();

        LedgerEvent::RoyaltyRecipientUpdated {
            token_id,
            old_recipient,
            new_recipient: new_recipient.clone(),
        }
        .emit();

        Ok(())
    }

    /// Computes the value legs of a resale settlement. Royalty is truncating
    /// integer math: `sale_price * 500 / 10_000`. Nothing moves here: the
    /// facade holds both legs in ledger custody until the distribution sink
    /// resolves. Custody is deliberately untouched; a marketplace settling a
    /// sale calls `transfer` separately.
    pub fn pay_royalty(
        &self,
        token_id: u64,
        sale_price: u128,
        deposit: u128,
    ) -> Result<RoyaltySettlement, LedgerError> {
        let record = self
            .tokens
            .get(&token_id)
            .ok_or(LedgerError::InvalidTokenId)?;
        if self.paused {
            return Err(LedgerError::Paused);
        }
        if sale_price == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if deposit != sale_price {
            return Err(LedgerError::InvalidAmount);
        }

        let royalty_amount = sale_price
            .checked_mul(ROYALTY_RATE_BPS as u128)
            .ok_or(LedgerError::InvalidAmount)?
            / BASIS_POINTS as u128;
        let remainder = sale_price - royalty_amount;
        let royalty_recipient = record.royalty_recipient.clone();

        Ok(RoyaltySettlement {
            royalty_recipient,
            royalty_amount,
            remainder,
        })
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.administrator {
            return Err(LedgerError::Unauthorized);
        }
        self.paused = true;
        LedgerEvent::LedgerPaused {
            administrator: caller.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.administrator {
            return Err(LedgerError::Unauthorized);
        }
        self.paused = false;
        LedgerEvent::LedgerUnpaused {
            administrator: caller.clone(),
        }
        .emit();
        Ok(())
    }

    pub fn set_distribution_target(
        &mut self,
        caller: &AccountId,
        new_target: AccountId,
    ) -> Result<(), LedgerError> {
        if caller != &self.administrator {
            return Err(LedgerError::Unauthorized);
        }
        let old_target = std::mem::replace(&mut self.distribution_target, new_target.clone());
        LedgerEvent::DistributionTargetUpdated {
            old_target,
            new_target,
        }
        .emit();
        Ok(())
    }

    // --- Reads ---

    /// Missing token is an error here, unlike `get_token_uri`; callers
    /// resolving custody must not mistake an absent record for a valid one.
    pub fn get_owner(&self, token_id: u64) -> Result<AccountId, LedgerError> {
        self.tokens
            .get(&token_id)
            .map(|record| record.owner.clone())
            .ok_or(LedgerError::InvalidTokenId)
    }

    pub fn get_token(&self, token_id: u64) -> Option<TokenRecord> {
        self.tokens.get(&token_id).cloned()
    }

    pub fn get_token_uri(&self, token_id: u64) -> Option<String> {
        self.token_uris.get(&token_id).cloned()
    }
}
