//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified success wrapper
//! - `ApiError`: Error response with HTTP status, numeric code and optional field errors
//! - `error_codes`: Standard error code constants

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::transfer::{TransferError, ValueError};
use crate::wallet::WalletError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// Per-field validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: i32,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
    pub errors: Option<FieldErrors>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
            errors: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    /// 400 carrying per-field messages
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request("Validation failed")
        }
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            error_codes::UNPROCESSABLE_BODY,
            msg,
        )
    }

    pub fn unauthorized(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, msg)
    }

    pub fn not_found(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, msg)
    }

    /// Opaque 500; the cause is logged by the caller, never returned
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Internal server error",
        )
    }

    pub fn timeout() -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            error_codes::REQUEST_TIMEOUT,
            "Request timed out",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            msg: self.msg,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match err {
            TransferError::SelfTransferNotAllowed => error_codes::SELF_TRANSFER,
            TransferError::TransferNotAllowedForWalletType => error_codes::WALLET_TYPE_NOT_ALLOWED,
            TransferError::InsufficientBalance => error_codes::INSUFFICIENT_BALANCE,
            TransferError::PayerWalletNotFound | TransferError::PayeeWalletNotFound => {
                error_codes::WALLET_NOT_FOUND
            }
            TransferError::TransferNotAuthorized => error_codes::TRANSFER_NOT_AUTHORIZED,
            TransferError::AuthorizationCheckFailed(_) => error_codes::AUTHORIZER_UNAVAILABLE,
            TransferError::WalletLookupFailed(_) | TransferError::AtomicWriteFailed(_) => {
                error_codes::INTERNAL_ERROR
            }
        };
        let msg = match &err {
            e if e.is_internal() => "Internal server error".to_string(),
            TransferError::AuthorizationCheckFailed(_) => {
                "Authorization service unavailable".to_string()
            }
            e => e.to_string(),
        };
        Self::new(status, code, msg)
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::AlreadyRegistered => Self::new(
                StatusCode::CONFLICT,
                error_codes::WALLET_EXISTS,
                err.to_string(),
            ),
            WalletError::Store(e) => {
                tracing::error!(error = %e, "Wallet store failure");
                Self::internal()
            }
        }
    }
}

impl From<ValueError> for ApiError {
    fn from(err: ValueError) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert("value".to_string(), vec![err.to_string()]);
        Self::validation(errors)
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const UNPROCESSABLE_BODY: i32 = 1003;
    pub const SELF_TRANSFER: i32 = 1004;
    pub const WALLET_TYPE_NOT_ALLOWED: i32 = 1005;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const TRANSFER_NOT_AUTHORIZED: i32 = 2003;

    // Resource errors (4xxx)
    pub const WALLET_NOT_FOUND: i32 = 4001;
    pub const TRANSFER_NOT_FOUND: i32 = 4002;
    pub const WALLET_EXISTS: i32 = 4009;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const AUTHORIZER_UNAVAILABLE: i32 = 5002;
    pub const REQUEST_TIMEOUT: i32 = 5004;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_mapping() {
        let e = ApiError::from(TransferError::InsufficientBalance);
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, error_codes::INSUFFICIENT_BALANCE);

        let e = ApiError::from(TransferError::TransferNotAuthorized);
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);

        let e = ApiError::from(TransferError::AuthorizationCheckFailed("refused".into()));
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!e.msg.contains("refused"));
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let e = ApiError::from(TransferError::AtomicWriteFailed(
            "deadlock detected on wallets".into(),
        ));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.msg, "Internal server error");
    }

    #[test]
    fn test_duplicate_wallet_is_conflict() {
        let e = ApiError::from(WalletError::AlreadyRegistered);
        assert_eq!(e.status, StatusCode::CONFLICT);
        assert_eq!(e.code, error_codes::WALLET_EXISTS);
    }
}
