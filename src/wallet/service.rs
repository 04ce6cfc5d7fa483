//! Wallet creation and lookup for the calling user

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use super::models::{Wallet, WalletType};
use super::repository::WalletStore;
use crate::core_types::UserId;
use crate::db::StoreError;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("The user already has a wallet")]
    AlreadyRegistered,

    #[error("Wallet store error: {0}")]
    Store(#[from] StoreError),
}

pub struct WalletService {
    store: Arc<dyn WalletStore>,
}

impl WalletService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Create the caller's wallet with a zero balance
    pub async fn create(
        &self,
        user_id: UserId,
        wallet_type: WalletType,
    ) -> Result<Wallet, WalletError> {
        if self.store.get_by_user_id(user_id).await?.is_some() {
            warn!(user_id = %user_id, "There is already a wallet for this user");
            return Err(WalletError::AlreadyRegistered);
        }

        let wallet = Wallet::new(user_id, wallet_type);
        match self.store.create(&wallet).await {
            Ok(()) => {}
            // Lost a race with a concurrent create for the same user
            Err(StoreError::AlreadyExists(_)) => return Err(WalletError::AlreadyRegistered),
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to create wallet");
                return Err(e.into());
            }
        }

        info!(user_id = %user_id, wallet_type = %wallet_type, "Wallet created");
        Ok(wallet)
    }

    pub async fn get(&self, user_id: UserId) -> Result<Option<Wallet>, WalletError> {
        Ok(self.store.get_by_user_id(user_id).await?)
    }
}
