use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// The stored hash could not be parsed, so the password cannot be checked
    /// against it. Distinct from a mismatch so callers can tell a corrupt
    /// record apart from a wrong password.
    #[error("Stored password hash is unverifiable: {0}")]
    Unverifiable(String),
}
