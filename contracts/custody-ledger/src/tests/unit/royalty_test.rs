use crate::errors::LedgerError;
use crate::tests::test_utils::*;
use near_sdk::json_types::U128;
use near_sdk::test_utils::get_logs;
use near_sdk::testing_env;

// --- update_royalty_recipient ---

#[test]
fn update_royalty_recipient_happy() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(alice()).build());
    ledger
        .update_royalty_recipient(token_id, charlie())
        .unwrap();

    let record = ledger.get_token(token_id).unwrap();
    assert_eq!(record.royalty_recipient, charlie());
    assert_eq!(record.owner, alice());
}

#[test]
fn update_royalty_recipient_non_owner_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(bob()).build());
    let err = ledger
        .update_royalty_recipient(token_id, charlie())
        .unwrap_err();
    assert_eq!(err, LedgerError::Unauthorized);
}

#[test]
fn update_royalty_recipient_by_current_recipient_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(alice()).build());
    ledger.update_royalty_recipient(token_id, bob()).unwrap();

    // bob receives royalties but does not own the token.
    testing_env!(context(bob()).build());
    let err = ledger
        .update_royalty_recipient(token_id, charlie())
        .unwrap_err();
    assert_eq!(err, LedgerError::Unauthorized);
}

#[test]
fn update_royalty_recipient_missing_token_fails() {
    let mut ledger = new_ledger();

    testing_env!(context(alice()).build());
    let err = ledger.update_royalty_recipient(42, bob()).unwrap_err();
    assert_eq!(err, LedgerError::InvalidTokenId);
}

#[test]
fn update_royalty_recipient_paused_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(admin()).build());
    ledger.pause().unwrap();

    testing_env!(context(alice()).build());
    let err = ledger
        .update_royalty_recipient(token_id, bob())
        .unwrap_err();
    assert_eq!(err, LedgerError::Paused);
}

#[test]
fn update_royalty_recipient_to_sentinel_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(alice()).build());
    let err = ledger
        .update_royalty_recipient(token_id, sentinel())
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidRecipient);
}

// --- pay_royalty ---

#[test]
fn royalty_truncates_at_five_percent() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    let settlement = ledger.state.pay_royalty(token_id, 10_000, 10_000).unwrap();
    assert_eq!(settlement.royalty_amount, 500);
    assert_eq!(settlement.remainder, 9_500);

    // floor(9999 * 500 / 10000) = 499 — truncation, not rounding.
    let settlement = ledger.state.pay_royalty(token_id, 9_999, 9_999).unwrap();
    assert_eq!(settlement.royalty_amount, 499);
    assert_eq!(settlement.remainder, 9_500);
}

#[test]
fn royalty_goes_to_original_recipient_by_default() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    let settlement = ledger.state.pay_royalty(token_id, 10_000, 10_000).unwrap();
    assert_eq!(settlement.royalty_recipient, alice());
}

#[test]
fn royalty_follows_recipient_update() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(alice()).build());
    ledger
        .update_royalty_recipient(token_id, charlie())
        .unwrap();

    let settlement = ledger.state.pay_royalty(token_id, 10_000, 10_000).unwrap();
    assert_eq!(settlement.royalty_recipient, charlie());
}

#[test]
fn pay_royalty_happy_via_contract() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context_with_deposit(bob(), 10_000).build());
    let _ = ledger.pay_royalty(token_id, U128(10_000)).unwrap();
}

#[test]
fn pay_royalty_zero_price_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(bob()).build());
    let err = ledger.pay_royalty(token_id, U128(0)).err().unwrap();
    assert_eq!(err, LedgerError::InvalidAmount);
}

#[test]
fn pay_royalty_deposit_mismatch_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context_with_deposit(bob(), 9_999).build());
    let err = ledger.pay_royalty(token_id, U128(10_000)).err().unwrap();
    assert_eq!(err, LedgerError::InvalidAmount);
}

#[test]
fn pay_royalty_missing_token_fails() {
    let mut ledger = new_ledger();

    testing_env!(context_with_deposit(bob(), 10_000).build());
    let err = ledger.pay_royalty(42, U128(10_000)).err().unwrap();
    assert_eq!(err, LedgerError::InvalidTokenId);
}

#[test]
fn pay_royalty_paused_fails() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(admin()).build());
    ledger.pause().unwrap();

    testing_env!(context_with_deposit(bob(), 10_000).build());
    let err = ledger.pay_royalty(token_id, U128(10_000)).err().unwrap();
    assert_eq!(err, LedgerError::Paused);
}

// Settlement moves value but never custody; a marketplace must call
// `transfer` separately. Documented gap in the settlement flow.
#[test]
fn pay_royalty_leaves_custody_unchanged() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context_with_deposit(bob(), 10_000).build());
    let _ = ledger.pay_royalty(token_id, U128(10_000)).unwrap();

    assert_eq!(ledger.get_owner(token_id).unwrap(), alice());
}

// --- distribution resolution ---

// Both value legs are held until the sink resolves; the royalty payout and
// its event only happen in the resolution callback.
#[test]
fn royalty_leg_waits_for_sink_resolution() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context_with_deposit(bob(), 10_000).build());
    let _ = ledger.pay_royalty(token_id, U128(10_000)).unwrap();

    let logs = get_logs();
    assert!(
        !logs.iter().any(|l| l.contains("royalty_paid")),
        "Royalty must not be released before the sink resolves, got: {:?}",
        logs
    );

    testing_env!(context(admin()).build());
    ledger.on_royalty_distribution(token_id, bob(), alice(), U128(500), U128(9_500), Ok(U128(7)));

    let logs = get_logs();
    assert!(
        logs.iter().any(|l| l.contains("royalty_paid")),
        "Expected royalty_paid event after sink acceptance, got: {:?}",
        logs
    );
}

#[test]
fn on_royalty_distribution_failure_refunds_full_sale_price() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(admin()).build());
    ledger.on_royalty_distribution(
        token_id,
        bob(),
        alice(),
        U128(500),
        U128(9_500),
        Err(near_sdk::PromiseError::Failed),
    );

    let logs = get_logs();
    assert!(
        logs.iter()
            .any(|l| l.contains("distribution_refunded") && l.contains("\"amount\":\"10000\"")),
        "Expected refund of the full sale price, got: {:?}",
        logs
    );
    assert!(
        !logs.iter().any(|l| l.contains("royalty_paid")),
        "No royalty payout on sink failure, got: {:?}",
        logs
    );
}

#[test]
fn on_royalty_distribution_success_pays_royalty() {
    let mut ledger = new_ledger();
    let token_id = mint_to(&mut ledger, alice(), 1_000);

    testing_env!(context(admin()).build());
    ledger.on_royalty_distribution(token_id, bob(), alice(), U128(500), U128(9_500), Ok(U128(7)));

    let logs = get_logs();
    assert!(
        logs.iter().any(|l| l.contains("royalty_paid")),
        "Expected royalty_paid event, got: {:?}",
        logs
    );
    assert!(
        !logs.iter().any(|l| l.contains("distribution_refunded")),
        "No refund expected, got: {:?}",
        logs
    );
}
