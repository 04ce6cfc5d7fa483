//! HTTP client for the external transfer authorizer

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{AuthorizationContext, AuthorizationDecision, AuthorizationError, Authorizer};
use crate::config::AuthorizerConfig;

/// Authorizer response body
///
/// The upstream answers 200 with `authorization: true` and 403 with
/// `authorization: false`; both carry the same shape.
#[derive(Debug, Deserialize)]
struct AuthorizationResponse {
    data: AuthorizationData,
}

#[derive(Debug, Deserialize)]
struct AuthorizationData {
    authorization: bool,
}

pub struct HttpAuthorizer {
    client: reqwest::Client,
    url: String,
}

impl HttpAuthorizer {
    pub fn new(config: &AuthorizerConfig) -> Result<Self, AuthorizationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthorizationError::Client(e.to_string()))?;

        info!(url = %config.url, "Authorization client initialized");
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl Authorizer for HttpAuthorizer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn check_authorization(
        &self,
        ctx: &AuthorizationContext,
    ) -> Result<AuthorizationDecision, AuthorizationError> {
        let resp = self.client.get(&self.url).send().await.map_err(|e| {
            error!(payer_id = %ctx.payer_id, error = %e, "Failed to perform authorization request");
            AuthorizationError::Connection(e.to_string())
        })?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Unexpected status code received");
            return Err(AuthorizationError::UnexpectedStatus(status.as_u16()));
        }

        let body: AuthorizationResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "Failed to decode authorization response");
            AuthorizationError::Decode(e.to_string())
        })?;

        info!(
            payer_id = %ctx.payer_id,
            payee_id = %ctx.payee_id,
            value = %ctx.value,
            authorized = body.data.authorization,
            "Authorization response decoded"
        );
        Ok(AuthorizationDecision {
            authorized: body.data.authorization,
        })
    }
}
