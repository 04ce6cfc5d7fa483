//! In-memory wallet store and transfer ledger
//!
//! Backs the service when no PostgreSQL URL is configured, and serves as the
//! store for engine tests. All state sits behind one async mutex, so the
//! atomic unit is trivially serializable: a commit either applies every
//! effect under the lock or leaves the state untouched.
//!
//! Faults can be injected at each stage of the atomic unit and on reads.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core_types::{TransferId, UserId};
use crate::db::StoreError;
use crate::transfer::{AtomicTransfer, Transfer, TransferLedger};
use crate::wallet::{Wallet, WalletStore};

/// Stage of the atomic unit at which an injected fault fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailStage {
    Lock,
    Debit,
    Credit,
    Record,
}

#[derive(Default)]
struct State {
    wallets: HashMap<UserId, Wallet>,
    transfers: Vec<Transfer>,
    fail_lookup: bool,
    fail_stage: Option<FailStage>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a wallet in place, replacing any existing one for the same user
    pub async fn insert_wallet(&self, wallet: Wallet) {
        self.state.lock().await.wallets.insert(wallet.user_id, wallet);
    }

    /// Make every wallet and ledger read fail with `Unavailable`
    pub async fn set_fail_lookup(&self, fail: bool) {
        self.state.lock().await.fail_lookup = fail;
    }

    /// Make the next commits fail at `stage`; `None` clears the fault
    pub async fn set_fail_stage(&self, stage: Option<FailStage>) {
        self.state.lock().await.fail_stage = stage;
    }

    pub async fn balance(&self, user_id: UserId) -> Option<Decimal> {
        self.state
            .lock()
            .await
            .wallets
            .get(&user_id)
            .map(|w| w.balance)
    }

    /// Snapshot of the ledger in insertion order
    pub async fn transfers(&self) -> Vec<Transfer> {
        self.state.lock().await.transfers.clone()
    }

    pub async fn transfer_count(&self) -> usize {
        self.state.lock().await.transfers.len()
    }
}

fn injected(stage: FailStage) -> StoreError {
    StoreError::Unavailable(format!("injected fault at {:?}", stage))
}

fn live_wallet(state: &State, user_id: UserId) -> Option<&Wallet> {
    state.wallets.get(&user_id).filter(|w| !w.is_deleted())
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Wallet>, StoreError> {
        let state = self.state.lock().await;
        if state.fail_lookup {
            return Err(StoreError::Unavailable("wallet lookup disabled".into()));
        }
        Ok(live_wallet(&state, user_id).cloned())
    }

    async fn create(&self, wallet: &Wallet) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.wallets.contains_key(&wallet.user_id) {
            return Err(StoreError::AlreadyExists(wallet.user_id));
        }
        state.wallets.insert(wallet.user_id, wallet.clone());
        Ok(())
    }
}

#[async_trait]
impl TransferLedger for MemoryStore {
    async fn get(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        let state = self.state.lock().await;
        if state.fail_lookup {
            return Err(StoreError::Unavailable("ledger lookup disabled".into()));
        }
        Ok(state
            .transfers
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Transfer>, StoreError> {
        let state = self.state.lock().await;
        if state.fail_lookup {
            return Err(StoreError::Unavailable("ledger lookup disabled".into()));
        }
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .transfers
            .iter()
            .rev()
            .filter(|t| t.involves(user_id) && t.deleted_at.is_none())
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AtomicTransfer for MemoryStore {
    async fn commit(&self, transfer: &Transfer) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let fail_stage = state.fail_stage;
        let fail_at = |stage: FailStage| -> Result<(), StoreError> {
            if fail_stage == Some(stage) {
                warn!(transfer_id = %transfer.id, stage = ?stage, "Injected atomic unit fault");
                return Err(injected(stage));
            }
            Ok(())
        };

        // Compute both new balances first; nothing is written until every step passed
        fail_at(FailStage::Lock)?;
        let payer = live_wallet(&state, transfer.payer_id)
            .ok_or(StoreError::WalletNotFound(transfer.payer_id))?;
        let payee = live_wallet(&state, transfer.payee_id)
            .ok_or(StoreError::WalletNotFound(transfer.payee_id))?;

        fail_at(FailStage::Debit)?;
        let payer_balance = payer.balance - transfer.value;
        if payer_balance < Decimal::ZERO {
            return Err(StoreError::BalanceConstraint(transfer.payer_id));
        }

        fail_at(FailStage::Credit)?;
        let payee_balance = payee.balance + transfer.value;

        fail_at(FailStage::Record)?;
        if state.transfers.iter().any(|t| t.id == transfer.id) {
            return Err(StoreError::Unavailable(format!(
                "duplicate transfer id {}",
                transfer.id
            )));
        }

        let now = chrono::Utc::now();
        for (user_id, balance) in [
            (transfer.payer_id, payer_balance),
            (transfer.payee_id, payee_balance),
        ] {
            if let Some(wallet) = state.wallets.get_mut(&user_id) {
                wallet.balance = balance;
                wallet.updated_at = Some(now);
            }
        }
        state.transfers.push(transfer.clone());

        debug!(transfer_id = %transfer.id, "Transfer committed in memory");
        Ok(())
    }
}
