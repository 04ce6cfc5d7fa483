//! Transfer Error Types
//!
//! Closed set of outcomes a transfer attempt can fail with. Every rule
//! violation and every store/authorizer failure maps to exactly one variant.

use thiserror::Error;

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Rule Violations ===
    #[error("Payer cannot perform transfers to themselves")]
    SelfTransferNotAllowed,

    #[error("Payer's wallet not found")]
    PayerWalletNotFound,

    #[error("Payee's wallet not found")]
    PayeeWalletNotFound,

    #[error("This wallet type is not allowed to transfer")]
    TransferNotAllowedForWalletType,

    #[error("Insufficient balance for the transfer")]
    InsufficientBalance,

    // === Authorization ===
    #[error("Authorization service did not authorize this transfer")]
    TransferNotAuthorized,

    #[error("Failed to check transfer authorization: {0}")]
    AuthorizationCheckFailed(String),

    // === System Errors ===
    #[error("Failed to load wallet: {0}")]
    WalletLookupFailed(String),

    #[error("Failed to apply transfer: {0}")]
    AtomicWriteFailed(String),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SelfTransferNotAllowed => "SELF_TRANSFER_NOT_ALLOWED",
            TransferError::PayerWalletNotFound => "PAYER_WALLET_NOT_FOUND",
            TransferError::PayeeWalletNotFound => "PAYEE_WALLET_NOT_FOUND",
            TransferError::TransferNotAllowedForWalletType => "WALLET_TYPE_NOT_ALLOWED",
            TransferError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            TransferError::TransferNotAuthorized => "TRANSFER_NOT_AUTHORIZED",
            TransferError::AuthorizationCheckFailed(_) => "AUTHORIZATION_CHECK_FAILED",
            TransferError::WalletLookupFailed(_) => "WALLET_LOOKUP_FAILED",
            TransferError::AtomicWriteFailed(_) => "ATOMIC_WRITE_FAILED",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InsufficientBalance => 400,
            TransferError::TransferNotAuthorized => 401,
            TransferError::SelfTransferNotAllowed
            | TransferError::TransferNotAllowedForWalletType => 403,
            TransferError::PayerWalletNotFound | TransferError::PayeeWalletNotFound => 404,
            TransferError::AuthorizationCheckFailed(_) => 503,
            TransferError::WalletLookupFailed(_) | TransferError::AtomicWriteFailed(_) => 500,
        }
    }

    /// Internal failures whose detail must not reach clients
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TransferError::WalletLookupFailed(_) | TransferError::AtomicWriteFailed(_)
        )
    }
}
