//! Request payloads and the validating JSON extractor

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::response::{ApiError, FieldErrors};
use crate::core_types::UserId;
use crate::transfer::{TransferValue, ValueError};
use crate::wallet::WalletType;

/// POST /private/transfer body
#[derive(Debug, Deserialize, Validate)]
pub struct TransferPayload {
    #[serde(rename = "payeeId")]
    pub payee_id: UserId,
    #[validate(custom(function = "validate_value"))]
    pub value: Decimal,
}

fn validate_value(value: &Decimal) -> Result<(), ValidationError> {
    TransferValue::new(*value).map(|_| ()).map_err(|e| {
        let code = match e {
            ValueError::NotPositive => "gt",
            ValueError::Precision { .. } => "precision",
        };
        ValidationError::new(code).with_message(e.to_string().into())
    })
}

/// POST /private/wallet body
#[derive(Debug, Deserialize, Validate)]
pub struct WalletPayload {
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
}

/// JSON body that has passed `Validate`
///
/// Undecodable bodies are rejected with 422, failed validation with 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::unprocessable(e.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::validation(field_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string that failed to decode is a 400 with the usual error body
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| ApiError::bad_request(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}

fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
