//! Transfer Engine
//!
//! Runs the business rules for one transfer attempt in a fixed order and hands
//! the accepted transfer to the atomic unit. The first failing rule decides the
//! error; later rules are not evaluated and nothing external is touched.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::atomic::AtomicTransfer;
use super::error::TransferError;
use super::types::{Transfer, TransferValue};
use crate::authorization::{AuthorizationContext, Authorizer};
use crate::core_types::UserId;
use crate::session::SessionIdentity;
use crate::wallet::{Wallet, WalletStore};

pub struct TransferEngine {
    wallets: Arc<dyn WalletStore>,
    authorizer: Arc<dyn Authorizer>,
    atomic: Arc<dyn AtomicTransfer>,
}

impl TransferEngine {
    pub fn new(
        wallets: Arc<dyn WalletStore>,
        authorizer: Arc<dyn Authorizer>,
        atomic: Arc<dyn AtomicTransfer>,
    ) -> Self {
        Self {
            wallets,
            authorizer,
            atomic,
        }
    }

    /// Move `value` from the caller's wallet to `payee_id`'s wallet.
    ///
    /// Rule order:
    /// 1. payer and payee must differ
    /// 2. payer wallet must exist
    /// 3. payee wallet must exist
    /// 4. payer wallet type must be allowed to pay
    /// 5. payer balance must cover `value`
    /// 6. the external authorizer must permit the transfer
    /// 7. debit, credit and ledger row commit together
    ///
    /// Positivity of `value` is guaranteed by [`TransferValue`].
    pub async fn transfer(
        &self,
        identity: &SessionIdentity,
        payee_id: UserId,
        value: TransferValue,
    ) -> Result<Transfer, TransferError> {
        let payer_id = identity.user_id;

        if payee_id == payer_id {
            warn!(payer_id = %payer_id, "Payer cannot perform transfers to themselves");
            return Err(TransferError::SelfTransferNotAllowed);
        }

        let payer = self
            .load_wallet(payer_id)
            .await?
            .ok_or_else(|| {
                warn!(payer_id = %payer_id, "Payer's wallet not found");
                TransferError::PayerWalletNotFound
            })?;

        let _payee = self
            .load_wallet(payee_id)
            .await?
            .ok_or_else(|| {
                warn!(payee_id = %payee_id, "Payee's wallet not found");
                TransferError::PayeeWalletNotFound
            })?;

        if !payer.wallet_type.can_pay() {
            warn!(
                payer_id = %payer_id,
                wallet_type = %payer.wallet_type,
                "This wallet type is not allowed to transfer"
            );
            return Err(TransferError::TransferNotAllowedForWalletType);
        }

        if !payer.covers(value.amount()) {
            warn!(
                payer_id = %payer_id,
                balance = %payer.balance,
                value = %value,
                "Insufficient balance for the transfer"
            );
            return Err(TransferError::InsufficientBalance);
        }

        let ctx = AuthorizationContext {
            payer_id,
            payee_id,
            value: value.amount(),
        };
        let decision = self
            .authorizer
            .check_authorization(&ctx)
            .await
            .map_err(|e| {
                error!(
                    payer_id = %payer_id,
                    payee_id = %payee_id,
                    authorizer = self.authorizer.name(),
                    error = %e,
                    "Failed to check transfer authorization"
                );
                TransferError::AuthorizationCheckFailed(e.to_string())
            })?;

        if !decision.authorized {
            warn!(
                payer_id = %payer_id,
                payee_id = %payee_id,
                value = %value,
                "Authorization service did not authorize this transfer"
            );
            return Err(TransferError::TransferNotAuthorized);
        }

        let transfer = Transfer::new(payer_id, payee_id, value);
        self.atomic.commit(&transfer).await.map_err(|e| {
            error!(
                transfer_id = %transfer.id,
                payer_id = %payer_id,
                payee_id = %payee_id,
                error = %e,
                "Failed to apply transfer"
            );
            TransferError::AtomicWriteFailed(e.to_string())
        })?;

        info!(
            transfer_id = %transfer.id,
            payer_id = %payer_id,
            payee_id = %payee_id,
            value = %value,
            "Transfer completed"
        );
        Ok(transfer)
    }

    async fn load_wallet(&self, user_id: UserId) -> Result<Option<Wallet>, TransferError> {
        self.wallets.get_by_user_id(user_id).await.map_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to load wallet");
            TransferError::WalletLookupFailed(e.to_string())
        })
    }
}
