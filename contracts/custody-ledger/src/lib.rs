//! Custody ledger for a fixed-supply set of non-fungible tokens.
//!
//! The contract facade reads the execution context (`predecessor`, attached
//! deposit) and delegates every operation to [`state::LedgerState`], which
//! holds all persistent state and enforces authorization and invariants.
//! Value leaves ledger custody only through native transfers and the
//! distribution sink, an external contract notified of every sale amount.

use crate::constants::{
    ASSET_TYPE_SITE, DEFAULT_MAX_SUPPLY, GAS_DISTRIBUTION_NOTIFY, GAS_RESOLVE_DISTRIBUTION,
    ROYALTY_RATE_BPS,
};
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::state::{LedgerState, StorageKey};
use crate::state_versions::StateV010;
use crate::types::TokenRecord;
use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{
    env, ext_contract, log, near, AccountId, NearToken, PanicOnDefault, Promise, PromiseError,
};

pub mod constants;
pub mod errors;
mod events;
pub mod state;
pub mod state_versions;
pub mod types;

/// Distribution sink collaborator: receives a value amount plus an
/// asset-type tag and returns a distribution identifier. Always invoked from
/// the ledger's own custody, after the ledger has taken the amount.
#[ext_contract(ext_distribution)]
pub trait DistributionSink {
    fn notify(&mut self, amount: U128, asset_type: String) -> U128;
}

#[ext_contract(ext_self)]
pub trait SelfCallback {
    fn on_mint_distribution(
        &mut self,
        token_id: u64,
        payer: AccountId,
        recipient: AccountId,
        price: U128,
    );
    fn on_royalty_distribution(
        &mut self,
        token_id: u64,
        payer: AccountId,
        royalty_recipient: AccountId,
        royalty_amount: U128,
        remainder: U128,
    );
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct CustodyLedger {
    state: LedgerState,
}

#[near]
impl CustodyLedger {
    #[init]
    #[handle_result]
    pub fn new(
        administrator: AccountId,
        distribution_target: AccountId,
        max_supply: u64,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            state: LedgerState::new(administrator, distribution_target, max_supply)?,
        })
    }

    /// Admin-only. The attached deposit is the mint payment and must equal
    /// `price`; it is forwarded in full to the distribution sink. If the
    /// sink rejects the notification, the mint is reverted and the payment
    /// refunded in `on_mint_distribution`.
    #[payable]
    #[handle_result]
    pub fn mint(
        &mut self,
        recipient: AccountId,
        metadata: String,
        uri: String,
        price: U128,
    ) -> Result<u64, LedgerError> {
        let caller = env::predecessor_account_id();
        let deposit = env::attached_deposit().as_yoctonear();
        let token_id = self
            .state
            .mint(&caller, &recipient, metadata, uri, price.0, deposit)?;

        if price.0 > 0 {
            // Detached: the mint result is the token identifier, not the
            // distribution outcome. The chain schedules on drop.
            let _ = ext_distribution::ext(self.state.distribution_target.clone())
                .with_attached_deposit(NearToken::from_yoctonear(price.0))
                .with_static_gas(GAS_DISTRIBUTION_NOTIFY)
                .notify(price, ASSET_TYPE_SITE.to_string())
                .then(
                    ext_self::ext(env::current_account_id())
                        .with_static_gas(GAS_RESOLVE_DISTRIBUTION)
                        .on_mint_distribution(token_id, caller, recipient, price),
                );
        }

        Ok(token_id)
    }

    #[handle_result]
    pub fn transfer(
        &mut self,
        token_id: u64,
        sender_id: AccountId,
        receiver_id: AccountId,
    ) -> Result<(), LedgerError> {
        self.state.transfer(
            &env::predecessor_account_id(),
            &sender_id,
            &receiver_id,
            token_id,
        )
    }

    /// Owner-only; the current royalty recipient has no say.
    #[handle_result]
    pub fn update_royalty_recipient(
        &mut self,
        token_id: u64,
        new_recipient: AccountId,
    ) -> Result<(), LedgerError> {
        self.state.update_royalty_recipient(
            &env::predecessor_account_id(),
            token_id,
            &new_recipient,
        )
    }

    /// Settles the value side of a resale: the attached deposit must equal
    /// `sale_price`. Both legs stay in ledger custody until the distribution
    /// sink accepts the remainder; `on_royalty_distribution` then releases
    /// the royalty cut to the token's royalty recipient, or refunds the full
    /// sale price if the sink rejects. Custody does not change; the
    /// marketplace calls `transfer` separately.
    #[payable]
    #[handle_result]
    pub fn pay_royalty(&mut self, token_id: u64, sale_price: U128) -> Result<Promise, LedgerError> {
        let caller = env::predecessor_account_id();
        let deposit = env::attached_deposit().as_yoctonear();
        let settlement = self.state.pay_royalty(token_id, sale_price.0, deposit)?;

        // The royalty cut is at most 5%, so the remainder is never zero for
        // a non-zero sale price.
        Ok(ext_distribution::ext(self.state.distribution_target.clone())
            .with_attached_deposit(NearToken::from_yoctonear(settlement.remainder))
            .with_static_gas(GAS_DISTRIBUTION_NOTIFY)
            .notify(U128(settlement.remainder), ASSET_TYPE_SITE.to_string())
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(GAS_RESOLVE_DISTRIBUTION)
                    .on_royalty_distribution(
                        token_id,
                        caller,
                        settlement.royalty_recipient,
                        U128(settlement.royalty_amount),
                        U128(settlement.remainder),
                    ),
            ))
    }

    // --- Admin ---

    #[handle_result]
    pub fn pause(&mut self) -> Result<(), LedgerError> {
        self.state.pause(&env::predecessor_account_id())
    }

    #[handle_result]
    pub fn unpause(&mut self) -> Result<(), LedgerError> {
        self.state.unpause(&env::predecessor_account_id())
    }

    #[handle_result]
    pub fn set_distribution_target(&mut self, new_target: AccountId) -> Result<(), LedgerError> {
        self.state
            .set_distribution_target(&env::predecessor_account_id(), new_target)
    }

    // --- Callbacks ---

    /// Compensation for the mint distribution leg. Must not panic: the
    /// callback window may have seen further custody changes.
    #[private]
    pub fn on_mint_distribution(
        &mut self,
        token_id: u64,
        payer: AccountId,
        recipient: AccountId,
        price: U128,
        #[callback_result] result: Result<U128, PromiseError>,
    ) {
        if result.is_ok() {
            return;
        }
        log!(
            "Distribution sink rejected mint payment for token {}, reverting",
            token_id
        );
        if let Some(refund) = self.state.revert_mint(token_id, &payer, &recipient, price.0) {
            let _ = Promise::new(payer).transfer(NearToken::from_yoctonear(refund));
        }
    }

    /// Resolves a royalty settlement. The royalty leg is released only once
    /// the sink has accepted the remainder; on rejection both legs are still
    /// in ledger custody and the full sale price goes back to the payer.
    #[private]
    pub fn on_royalty_distribution(
        &mut self,
        token_id: u64,
        payer: AccountId,
        royalty_recipient: AccountId,
        royalty_amount: U128,
        remainder: U128,
        #[callback_result] result: Result<U128, PromiseError>,
    ) {
        if result.is_err() {
            log!(
                "Distribution sink rejected royalty remainder for token {}, refunding payer",
                token_id
            );
            let refund = royalty_amount.0 + remainder.0;
            LedgerEvent::DistributionRefunded {
                token_id,
                payer: payer.clone(),
                amount: U128(refund),
            }
            .emit();
            let _ = Promise::new(payer).transfer(NearToken::from_yoctonear(refund));
            return;
        }
        if royalty_amount.0 > 0 {
            let _ = Promise::new(royalty_recipient.clone())
                .transfer(NearToken::from_yoctonear(royalty_amount.0));
        }
        LedgerEvent::RoyaltyPaid {
            token_id,
            payer,
            recipient: royalty_recipient,
            royalty_amount,
            remainder,
        }
        .emit();
    }

    // --- Views ---

    pub fn get_last_token_id(&self) -> u64 {
        self.state.last_token_id
    }

    /// Missing tokens are an error here; `get_token_uri` returns an empty
    /// result instead.
    #[handle_result]
    pub fn get_owner(&self, token_id: u64) -> Result<AccountId, LedgerError> {
        self.state.get_owner(token_id)
    }

    pub fn get_token(&self, token_id: u64) -> Option<TokenRecord> {
        self.state.get_token(token_id)
    }

    pub fn get_token_uri(&self, token_id: u64) -> Option<String> {
        self.state.get_token_uri(token_id)
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn get_distribution_target(&self) -> AccountId {
        self.state.distribution_target.clone()
    }

    pub fn get_administrator(&self) -> AccountId {
        self.state.administrator.clone()
    }

    pub fn get_max_supply(&self) -> u64 {
        self.state.max_supply
    }

    pub fn get_royalty_rate_bps(&self) -> u16 {
        ROYALTY_RATE_BPS
    }

    pub fn get_version(&self) -> String {
        self.state.version.clone()
    }

    // --- Upgrade ---

    /// Runs state migration on redeploy.
    #[private]
    #[init(ignore_state)]
    pub fn migrate() -> Self {
        use near_sdk::borsh;

        const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

        let state_bytes: Vec<u8> = env::state_read().unwrap_or_default();

        if let Ok(state) = borsh::from_slice::<LedgerState>(&state_bytes) {
            if state.version == CURRENT_VERSION {
                env::log_str("State is already at latest version");
                return Self { state };
            }
        }

        if let Ok(old_state) = borsh::from_slice::<StateV010>(&state_bytes) {
            if old_state.version == "0.1.0" {
                env::log_str("Migrating from state version 0.1.0");
                let new_state = LedgerState {
                    version: CURRENT_VERSION.to_string(),
                    administrator: old_state.administrator,
                    distribution_target: old_state.distribution_target,
                    paused: old_state.paused,
                    last_token_id: old_state.last_token_id,
                    max_supply: DEFAULT_MAX_SUPPLY,
                    tokens: old_state.tokens,
                    token_uris: old_state.token_uris,
                };
                LedgerEvent::StateMigrated {
                    old_version: "0.1.0".to_string(),
                    new_version: CURRENT_VERSION.to_string(),
                }
                .emit();
                return Self { state: new_state };
            }
        }

        env::log_str("No valid prior state found, initializing new state");
        Self {
            state: LedgerState {
                version: CURRENT_VERSION.to_string(),
                administrator: env::current_account_id(),
                distribution_target: env::current_account_id(),
                paused: false,
                last_token_id: 0,
                max_supply: DEFAULT_MAX_SUPPLY,
                tokens: LookupMap::new(StorageKey::Tokens),
                token_uris: LookupMap::new(StorageKey::TokenUris),
            },
        }
    }
}
