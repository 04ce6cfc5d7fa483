use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::SessionError;
use crate::gateway::{
    state::AppState,
    types::{ApiError, error_codes},
};

/// Resolve the Bearer token into a `SessionIdentity` request extension
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::from(SessionError::MissingToken))?;

    let identity = state.sessions.verify(token).map_err(|e| {
        debug!(error = %e, "Session token rejected");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingToken => {
                ApiError::unauthorized(error_codes::MISSING_AUTH, "Missing Authorization header")
            }
            SessionError::InvalidToken(_) | SessionError::InvalidSubject => {
                ApiError::unauthorized(error_codes::AUTH_FAILED, "Invalid or expired token")
            }
        }
    }
}
