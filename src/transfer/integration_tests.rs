//! Integration Tests for the Transfer Engine
//!
//! Full rule sequence against the in-memory store and a scripted authorizer.
//! No database or network needed.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::authorization::AuthorizationError;
use crate::authorization::mock::MockAuthorizer;
use crate::core_types::UserId;
use crate::memory::{FailStage, MemoryStore};
use crate::session::SessionIdentity;
use crate::transfer::{TransferEngine, TransferError, TransferLedger, TransferValue};
use crate::wallet::{Wallet, WalletStore, WalletType};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn value(s: &str) -> TransferValue {
    TransferValue::new(dec(s)).unwrap()
}

fn identity(user_id: UserId) -> SessionIdentity {
    SessionIdentity {
        user_id,
        name: "payer".to_string(),
        email: "payer@example.com".to_string(),
    }
}

struct TestHarness {
    engine: TransferEngine,
    store: Arc<MemoryStore>,
    authorizer: Arc<MockAuthorizer>,
}

impl TestHarness {
    fn new(authorizer: MockAuthorizer) -> Self {
        let store = Arc::new(MemoryStore::new());
        let authorizer = Arc::new(authorizer);
        let engine = TransferEngine::new(store.clone(), authorizer.clone(), store.clone());
        Self {
            engine,
            store,
            authorizer,
        }
    }

    fn permitting() -> Self {
        Self::new(MockAuthorizer::permitting())
    }

    async fn wallet(&self, wallet_type: WalletType, balance: &str) -> UserId {
        let user_id = UserId::new_v4();
        self.store
            .insert_wallet(Wallet::with_balance(user_id, wallet_type, dec(balance)))
            .await;
        user_id
    }

    async fn balance(&self, user_id: UserId) -> Decimal {
        self.store.balance(user_id).await.unwrap()
    }

    async fn assert_untouched(
        &self,
        payer: UserId,
        payer_balance: &str,
        payee: UserId,
        payee_balance: &str,
    ) {
        assert_eq!(self.balance(payer).await, dec(payer_balance));
        assert_eq!(self.balance(payee).await, dec(payee_balance));
        assert_eq!(self.store.transfer_count().await, 0);
    }
}

// ========================================================================
// Scenarios
// ========================================================================

#[tokio::test]
async fn test_transfer_moves_value_and_records_once() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Merchant, "5.00").await;

    let transfer = h
        .engine
        .transfer(&identity(payer), payee, value("40.00"))
        .await
        .unwrap();

    assert_eq!(h.balance(payer).await, dec("60.00"));
    assert_eq!(h.balance(payee).await, dec("45.00"));
    assert_eq!(transfer.value, dec("40.00"));
    assert_eq!(transfer.payer_id, payer);
    assert_eq!(transfer.payee_id, payee);

    let ledger = h.store.transfers().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0], transfer);
    assert_eq!(h.authorizer.call_count(), 1);
}

#[tokio::test]
async fn test_insufficient_balance_skips_authorizer() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "10.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let result = h.engine.transfer(&identity(payer), payee, value("40.00")).await;

    assert_eq!(result.unwrap_err(), TransferError::InsufficientBalance);
    h.assert_untouched(payer, "10.00", payee, "0.00").await;
    assert_eq!(h.authorizer.call_count(), 0);
}

#[tokio::test]
async fn test_exact_balance_is_sufficient() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "40.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    h.engine
        .transfer(&identity(payer), payee, value("40.00"))
        .await
        .unwrap();
    assert_eq!(h.balance(payer).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_self_transfer_rejected_before_any_lookup() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "100.00").await;
    // Any store read would fail; the rule must fire first
    h.store.set_fail_lookup(true).await;

    let result = h.engine.transfer(&identity(payer), payer, value("1.00")).await;

    assert_eq!(result.unwrap_err(), TransferError::SelfTransferNotAllowed);
    assert_eq!(h.authorizer.call_count(), 0);
    h.store.set_fail_lookup(false).await;
    assert_eq!(h.balance(payer).await, dec("100.00"));
}

#[tokio::test]
async fn test_missing_payer_wallet() {
    let h = TestHarness::permitting();
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let result = h
        .engine
        .transfer(&identity(UserId::new_v4()), payee, value("1.00"))
        .await;
    assert_eq!(result.unwrap_err(), TransferError::PayerWalletNotFound);
}

#[tokio::test]
async fn test_missing_payee_wallet() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "100.00").await;

    let result = h
        .engine
        .transfer(&identity(payer), UserId::new_v4(), value("10.00"))
        .await;

    assert_eq!(result.unwrap_err(), TransferError::PayeeWalletNotFound);
    assert_eq!(h.balance(payer).await, dec("100.00"));
    assert_eq!(h.store.transfer_count().await, 0);
    assert_eq!(h.authorizer.call_count(), 0);
}

#[tokio::test]
async fn test_missing_payee_wins_over_merchant_payer() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Merchant, "1000.00").await;

    let result = h
        .engine
        .transfer(&identity(payer), UserId::new_v4(), value("10.00"))
        .await;
    assert_eq!(result.unwrap_err(), TransferError::PayeeWalletNotFound);
}

#[tokio::test]
async fn test_denied_authorization_leaves_no_effect() {
    let h = TestHarness::new(MockAuthorizer::denying());
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let result = h.engine.transfer(&identity(payer), payee, value("40.00")).await;

    assert_eq!(result.unwrap_err(), TransferError::TransferNotAuthorized);
    h.assert_untouched(payer, "100.00", payee, "0.00").await;
    assert_eq!(h.authorizer.call_count(), 1);
}

#[tokio::test]
async fn test_merchant_payer_rejected_regardless_of_authorization() {
    for authorizer in [MockAuthorizer::permitting(), MockAuthorizer::denying()] {
        let h = TestHarness::new(authorizer);
        let payer = h.wallet(WalletType::Merchant, "1000.00").await;
        let payee = h.wallet(WalletType::Common, "0.00").await;

        let result = h.engine.transfer(&identity(payer), payee, value("10.00")).await;

        assert_eq!(
            result.unwrap_err(),
            TransferError::TransferNotAllowedForWalletType
        );
        h.assert_untouched(payer, "1000.00", payee, "0.00").await;
        assert_eq!(h.authorizer.call_count(), 0);
    }
}

// ========================================================================
// Failure Handling
// ========================================================================

#[tokio::test]
async fn test_unreachable_authorizer_is_distinct_from_denial() {
    let h = TestHarness::new(MockAuthorizer::failing(AuthorizationError::Connection(
        "connection refused".into(),
    )));
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let result = h.engine.transfer(&identity(payer), payee, value("40.00")).await;

    assert!(matches!(
        result,
        Err(TransferError::AuthorizationCheckFailed(_))
    ));
    h.assert_untouched(payer, "100.00", payee, "0.00").await;
}

#[tokio::test]
async fn test_unexpected_authorizer_status() {
    let h = TestHarness::new(MockAuthorizer::failing(AuthorizationError::UnexpectedStatus(
        502,
    )));
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let result = h.engine.transfer(&identity(payer), payee, value("1.00")).await;
    assert!(matches!(
        result,
        Err(TransferError::AuthorizationCheckFailed(_))
    ));
}

#[tokio::test]
async fn test_wallet_lookup_failure() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;
    h.store.set_fail_lookup(true).await;

    let result = h.engine.transfer(&identity(payer), payee, value("1.00")).await;

    assert!(matches!(result, Err(TransferError::WalletLookupFailed(_))));
    assert_eq!(h.authorizer.call_count(), 0);
}

#[tokio::test]
async fn test_atomic_failure_at_every_stage_rolls_back() {
    for stage in [
        FailStage::Lock,
        FailStage::Debit,
        FailStage::Credit,
        FailStage::Record,
    ] {
        let h = TestHarness::permitting();
        let payer = h.wallet(WalletType::Common, "100.00").await;
        let payee = h.wallet(WalletType::Common, "7.50").await;
        h.store.set_fail_stage(Some(stage)).await;

        let result = h.engine.transfer(&identity(payer), payee, value("40.00")).await;

        assert!(
            matches!(result, Err(TransferError::AtomicWriteFailed(_))),
            "stage {:?}",
            stage
        );
        h.assert_untouched(payer, "100.00", payee, "7.50").await;
        assert_eq!(h.authorizer.call_count(), 1);
    }
}

#[tokio::test]
async fn test_no_retry_after_failure() {
    let h = TestHarness::new(MockAuthorizer::denying());
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let _ = h.engine.transfer(&identity(payer), payee, value("1.00")).await;
    assert_eq!(h.authorizer.call_count(), 1);

    // A fresh request re-runs every rule, including authorization
    h.authorizer
        .set_outcome(Ok(crate::authorization::AuthorizationDecision::permit()));
    h.engine
        .transfer(&identity(payer), payee, value("1.00"))
        .await
        .unwrap();
    assert_eq!(h.authorizer.call_count(), 2);
    assert_eq!(h.store.transfer_count().await, 1);
}

// ========================================================================
// Concurrency
// ========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_never_overdraw() {
    let h = Arc::new(TestHarness::permitting());
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;

    let mut handles = Vec::new();
    for _ in 0..5 {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            h.engine
                .transfer(&identity(payer), payee, value("40.00"))
                .await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            // Late readers see the low balance, early readers lose at commit
            Err(e) => assert!(
                matches!(
                    e,
                    TransferError::InsufficientBalance | TransferError::AtomicWriteFailed(_)
                ),
                "unexpected error {:?}",
                e
            ),
        }
    }

    assert_eq!(committed, 2);
    assert_eq!(h.balance(payer).await, dec("20.00"));
    assert_eq!(h.balance(payee).await, dec("80.00"));
    assert_eq!(h.store.transfer_count().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposite_direction_transfers_both_commit() {
    let h = Arc::new(TestHarness::permitting());
    let a = h.wallet(WalletType::Common, "50.00").await;
    let b = h.wallet(WalletType::Common, "50.00").await;

    let h1 = h.clone();
    let h2 = h.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { h1.engine.transfer(&identity(a), b, value("30.00")).await }),
        tokio::spawn(async move { h2.engine.transfer(&identity(b), a, value("20.00")).await }),
    );
    r1.unwrap().unwrap();
    r2.unwrap().unwrap();

    assert_eq!(h.balance(a).await, dec("40.00"));
    assert_eq!(h.balance(b).await, dec("60.00"));
}

// ========================================================================
// Read Paths
// ========================================================================

#[tokio::test]
async fn test_reads_do_not_change_state() {
    let h = TestHarness::permitting();
    let payer = h.wallet(WalletType::Common, "100.00").await;
    let payee = h.wallet(WalletType::Common, "0.00").await;
    let bystander = h.wallet(WalletType::Merchant, "12.34").await;

    let transfer = h
        .engine
        .transfer(&identity(payer), payee, value("40.00"))
        .await
        .unwrap();

    let first = h.store.get_by_user_id(bystander).await.unwrap();
    let second = h.store.get_by_user_id(bystander).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.balance(bystander).await, dec("12.34"));

    assert_eq!(h.store.get(transfer.id).await.unwrap(), Some(transfer.clone()));
    assert_eq!(h.store.get(transfer.id).await.unwrap(), Some(transfer));
    assert_eq!(h.store.transfer_count().await, 1);
}
