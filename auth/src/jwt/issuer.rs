use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;
use crate::config::AuthConfig;

/// Mints signed, expiring bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) over the configured signing key. Tokens carry
/// no nonce, so two tokens for the same account issued within the same second
/// are byte-identical.
pub struct TokenIssuer {
    config: AuthConfig,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.signing_key());
        Self {
            config,
            encoding_key,
        }
    }

    /// Issue a token valid from now for the configured lifetime.
    ///
    /// # Arguments
    /// * `subject` - Account identifier, written to `sub`
    /// * `display_name` - Username, written to `unique_name`
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    /// * `ExpirationOutOfRange` - `now` plus the lifetime is not a valid instant
    pub fn issue(&self, subject: impl ToString, display_name: &str) -> Result<String, TokenError> {
        self.issue_at(subject, display_name, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::for_account(
            subject,
            display_name,
            self.config.issuer(),
            self.config.audience(),
            now,
            self.config.token_lifetime_minutes(),
        )
        .ok_or(TokenError::ExpirationOutOfRange)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}
