use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by every bearer token.
///
/// Timestamps are Unix seconds, as in RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Display name (username at the time of issue)
    pub unique_name: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for an account, valid from `now` for `lifetime_minutes`.
    ///
    /// Returns `None` when the expiration falls outside the representable range.
    pub fn for_account(
        subject: impl ToString,
        display_name: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        now: DateTime<Utc>,
        lifetime_minutes: i64,
    ) -> Option<Self> {
        let expiration = Duration::try_minutes(lifetime_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))?;

        Some(Self {
            sub: subject.to_string(),
            unique_name: display_name.into(),
            iss: issuer.into(),
            aud: audience.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Check if the token is expired at the given instant.
    ///
    /// Expiry is exclusive: a token is already expired at exactly `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp.saturating_mul(1000)
    }

    /// Check if the token was issued after the given instant.
    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() < self.iat.saturating_mul(1000)
    }
}
