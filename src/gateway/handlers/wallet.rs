use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResponse, ApiResult, ValidatedJson, WalletPayload, error_codes,
};
use crate::session::SessionIdentity;
use crate::wallet::Wallet;

/// POST /api/v1/private/wallet
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    ValidatedJson(payload): ValidatedJson<WalletPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Wallet>>)> {
    let wallet = state
        .wallets
        .create(identity.user_id, payload.wallet_type)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(wallet))))
}

/// GET /api/v1/private/wallet
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Json<ApiResponse<Wallet>>> {
    state
        .wallets
        .get(identity.user_id)
        .await?
        .map(|w| Json(ApiResponse::success(w)))
        .ok_or_else(|| ApiError::not_found(error_codes::WALLET_NOT_FOUND, "Wallet not found"))
}
