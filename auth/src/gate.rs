use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::AuthenticatedIdentity;
use crate::jwt::TokenRejection;
use crate::jwt::TokenValidator;

const BEARER_SCHEME: &str = "Bearer";

/// Reason a request was refused by the gate.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateRejection {
    #[error("missing Authorization header")]
    MissingCredentials,

    #[error("invalid Authorization header format, expected: Bearer <token>")]
    InvalidScheme,

    #[error(transparent)]
    Token(#[from] TokenRejection),
}

/// Request interceptor for protected operations.
///
/// Independent of any HTTP framework: adapters hand it the raw value of the
/// `Authorization` header and either attach the returned identity to their
/// request context or short-circuit with the rejection. Nothing is mutated
/// either way.
#[derive(Clone)]
pub struct BearerGate {
    validator: Arc<TokenValidator>,
}

impl BearerGate {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Authorize a request from its `Authorization` header value.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedIdentity, GateRejection> {
        self.authorize_at(authorization, Utc::now())
    }

    /// Authorize a request as if the current time were `now`.
    pub fn authorize_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, GateRejection> {
        let token = bearer_token(authorization)?;
        Ok(self.validator.validate_at(token, now)?)
    }
}

/// Auth scheme names are case-insensitive (RFC 7235).
fn bearer_token(authorization: Option<&str>) -> Result<&str, GateRejection> {
    let value = authorization.ok_or(GateRejection::MissingCredentials)?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or(GateRejection::InvalidScheme)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(GateRejection::InvalidScheme);
    }

    Ok(token)
}
