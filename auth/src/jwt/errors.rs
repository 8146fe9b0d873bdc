use thiserror::Error;

/// Error raised while minting a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token expiration is out of range")]
    ExpirationOutOfRange,
}

/// Reason a presented token was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("token signature is invalid")]
    BadSignature,

    #[error("token issuer mismatch")]
    IssuerMismatch,

    #[error("token audience mismatch")]
    AudienceMismatch,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("token is malformed")]
    Malformed,
}
