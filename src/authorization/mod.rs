//! Authorization Gateway
//!
//! One outbound check per transfer attempt. Callers must be able to tell
//! "the authorizer said no" (`Ok(decision)` with `authorized == false`) apart
//! from "the authorizer could not be consulted" (`Err(AuthorizationError)`).
//! No retries happen at this layer.

pub mod http;

pub use http::HttpAuthorizer;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::core_types::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Failed to connect to the authorization API: {0}")]
    Connection(String),

    #[error("Unexpected status code from authorization API: {0}")]
    UnexpectedStatus(u16),

    #[error("Failed to decode authorization response: {0}")]
    Decode(String),

    #[error("Failed to build authorization client: {0}")]
    Client(String),
}

/// The pending attempt being authorized
///
/// Only used for logging; the upstream call carries no request body.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationContext {
    pub payer_id: UserId,
    pub payee_id: UserId,
    pub value: Decimal,
}

/// Well-formed answer from the authorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub authorized: bool,
}

impl AuthorizationDecision {
    pub fn permit() -> Self {
        Self { authorized: true }
    }

    pub fn deny() -> Self {
        Self { authorized: false }
    }
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Get authorizer name for logging
    fn name(&self) -> &'static str;

    async fn check_authorization(
        &self,
        ctx: &AuthorizationContext,
    ) -> Result<AuthorizationDecision, AuthorizationError>;
}
