use std::fmt;

use thiserror::Error;

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 60;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 366 * 24 * 60;

/// Error raised while assembling the authentication configuration.
///
/// Any of these is fatal: the process must not start serving requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT signing key is missing or empty")]
    MissingSigningKey,

    #[error("Token lifetime must be positive and at most one year, got {0} minutes")]
    InvalidLifetime(i64),
}

/// Process-wide authentication settings.
///
/// Built once at startup and handed to [`TokenIssuer`](crate::TokenIssuer) and
/// [`TokenValidator`](crate::TokenValidator). There are no setters; a new value
/// must be constructed to change anything.
#[derive(Clone)]
pub struct AuthConfig {
    signing_key: Vec<u8>,
    issuer: String,
    audience: String,
    token_lifetime_minutes: i64,
}

impl AuthConfig {
    /// Create a configuration with the default token lifetime.
    ///
    /// # Arguments
    /// * `signing_key` - HMAC secret, must be non-empty
    /// * `issuer` - Value written to and expected in the `iss` claim
    /// * `audience` - Value written to and expected in the `aud` claim
    ///
    /// # Errors
    /// * `MissingSigningKey` - Key is empty
    pub fn new(
        signing_key: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let signing_key = signing_key.into();
        if signing_key.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }

        Ok(Self {
            signing_key,
            issuer: issuer.into(),
            audience: audience.into(),
            token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
        })
    }

    /// Return a copy with a different token lifetime.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Lifetime is zero, negative or longer than a year
    pub fn with_token_lifetime(mut self, minutes: i64) -> Result<Self, ConfigError> {
        if !(1..=MAX_TOKEN_LIFETIME_MINUTES).contains(&minutes) {
            return Err(ConfigError::InvalidLifetime(minutes));
        }
        self.token_lifetime_minutes = minutes;
        Ok(self)
    }

    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn token_lifetime_minutes(&self) -> i64 {
        self.token_lifetime_minutes
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_lifetime_minutes", &self.token_lifetime_minutes)
            .finish()
    }
}
