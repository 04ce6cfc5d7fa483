//! Transfer handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{error, warn};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiQuery, ApiResponse, ApiResult, TransferPayload, ValidatedJson, error_codes,
};
use crate::core_types::TransferId;
use crate::session::SessionIdentity;
use crate::transfer::{Transfer, TransferValue};

/// POST /api/v1/private/transfer
///
/// 201 with no body on success. The engine call runs under the configured
/// request deadline; on expiry the in-flight future is dropped, which rolls
/// back any open database transaction.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    ValidatedJson(payload): ValidatedJson<TransferPayload>,
) -> ApiResult<StatusCode> {
    let value = TransferValue::new(payload.value)?;

    let attempt = state.engine.transfer(&identity, payload.payee_id, value);
    match tokio::time::timeout(state.request_timeout, attempt).await {
        Ok(Ok(_)) => Ok(StatusCode::CREATED),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            warn!(
                payer_id = %identity.user_id,
                payee_id = %payload.payee_id,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Transfer request timed out"
            );
            Err(ApiError::timeout())
        }
    }
}

/// GET /api/v1/private/transfer/{id}
///
/// Only the payer or the payee can see a transfer; anyone else gets 404.
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Transfer>>> {
    let id: TransferId = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid transfer ID format"))?;

    let transfer = state.ledger.get(id).await.map_err(|e| {
        error!(transfer_id = %id, error = %e, "Failed to load transfer");
        ApiError::internal()
    })?;

    match transfer {
        Some(t) if t.involves(identity.user_id) => Ok(Json(ApiResponse::success(t))),
        _ => Err(ApiError::not_found(
            error_codes::TRANSFER_NOT_FOUND,
            "Transfer not found",
        )),
    }
}

/// Maximum number of transfers returned by one listing
pub const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/private/transfer?limit=N
///
/// Caller's transfers (as payer or payee), newest first.
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Transfer>>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, MAX_LIST_LIMIT);

    let transfers = state
        .ledger
        .list_for_user(identity.user_id, limit)
        .await
        .map_err(|e| {
            error!(user_id = %identity.user_id, error = %e, "Failed to list transfers");
            ApiError::internal()
        })?;

    Ok(Json(ApiResponse::success(transfers)))
}
