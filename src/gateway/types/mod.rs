//! Gateway types module
//!
//! ## Input Types
//! - [`TransferPayload`], [`WalletPayload`]: request bodies
//! - [`ValidatedJson`]: Axum extractor that decodes then validates a body
//! - [`ApiQuery`]: query string extractor with `ApiError` rejections
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error response

pub mod payload;
pub mod response;

pub use payload::{ApiQuery, TransferPayload, ValidatedJson, WalletPayload};
pub use response::{ApiError, ApiResponse, ApiResult, FieldErrors, error_codes};
