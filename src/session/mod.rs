//! Session tokens
//!
//! The caller's identity arrives as an HS256 JWT. [`SessionVerifier`] turns a
//! token into a [`SessionIdentity`]; the middleware in [`middleware`] does that
//! for every private route and stores the identity in request extensions.

pub mod middleware;

pub use middleware::session_middleware;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::core_types::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a valid user id")]
    InvalidSubject,
}

/// Authenticated caller, resolved once per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id as string
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl SessionVerifier {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs: config.ttl_secs,
        }
    }

    /// Sign a token for `identity` valid for the configured TTL
    pub fn issue(&self, identity: &SessionIdentity) -> Result<String, SessionError> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            exp: now + self.ttl_secs as usize,
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionIdentity, SessionError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| SessionError::InvalidSubject)?;

        Ok(SessionIdentity {
            user_id,
            name: data.claims.name,
            email: data.claims.email,
        })
    }
}
