use thiserror::Error;

use crate::core_types::UserId;

/// Errors raised by wallet and ledger stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Wallet not found for user {0}")]
    WalletNotFound(UserId),

    #[error("Balance of wallet {0} would become negative")]
    BalanceConstraint(UserId),

    #[error("Wallet already exists for user {0}")]
    AlreadyExists(UserId),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
