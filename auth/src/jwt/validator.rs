use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenRejection;
use crate::config::AuthConfig;

/// Identity extracted from a token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub subject: String,
    pub display_name: String,
}

/// Verifies inbound bearer tokens.
///
/// Checks run in a fixed order and the first failure wins: signature, issuer,
/// audience, expiry, issued-at. Stateless, so a single instance can be shared
/// across any number of concurrent requests.
pub struct TokenValidator {
    config: AuthConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks are done on our side at millisecond resolution
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.signing_key()),
            config,
            validation,
        }
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, TokenRejection> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `BadSignature` - Signed with another key or algorithm
    /// * `IssuerMismatch` / `AudienceMismatch` - Claims do not match configuration
    /// * `Expired` - `now` is at or past `exp`
    /// * `NotYetValid` - `now` is before `iat`
    /// * `Malformed` - Not a decodable JWT or missing claims
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedIdentity, TokenRejection> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if claims.iss != self.config.issuer() {
            return Err(TokenRejection::IssuerMismatch);
        }
        if claims.aud != self.config.audience() {
            return Err(TokenRejection::AudienceMismatch);
        }
        if claims.is_expired(now) {
            return Err(TokenRejection::Expired);
        }
        if claims.is_not_yet_valid(now) {
            return Err(TokenRejection::NotYetValid);
        }

        Ok(AuthenticatedIdentity {
            subject: claims.sub,
            display_name: claims.unique_name,
        })
    }
}

fn classify(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenRejection::BadSignature,
        ErrorKind::InvalidIssuer => TokenRejection::IssuerMismatch,
        ErrorKind::InvalidAudience => TokenRejection::AudienceMismatch,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use jsonwebtoken::encode;
    use jsonwebtoken::EncodingKey;
    use jsonwebtoken::Header;

    use super::*;
    use crate::jwt::issuer::TokenIssuer;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn config() -> AuthConfig {
        AuthConfig::new(SECRET, "account-service", "account-clients").unwrap()
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new(config());
        let validator = TokenValidator::new(config());

        let token = issuer.issue(1, "alice").expect("Failed to issue token");
        assert!(!token.is_empty());

        let identity = validator.validate(&token).expect("Token validation failed");
        assert_eq!(identity.subject, "1");
        assert_eq!(identity.display_name, "alice");
    }

    #[test]
    fn test_same_instant_yields_same_token() {
        let issuer = TokenIssuer::new(config());

        let first = issuer.issue_at(1, "alice", issued_at()).unwrap();
        let second = issuer.issue_at(1, "alice", issued_at()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = TokenIssuer::new(config());
        let validator = TokenValidator::new(config());

        let token = issuer.issue_at(1, "alice", issued_at()).unwrap();
        let expiry = issued_at() + Duration::minutes(60);

        assert!(validator
            .validate_at(&token, expiry - Duration::milliseconds(1))
            .is_ok());
        assert_eq!(
            validator.validate_at(&token, expiry),
            Err(TokenRejection::Expired)
        );
        assert_eq!(
            validator.validate_at(&token, expiry + Duration::days(1)),
            Err(TokenRejection::Expired)
        );
    }

    #[test]
    fn test_token_from_the_future_is_not_yet_valid() {
        let issuer = TokenIssuer::new(config());
        let validator = TokenValidator::new(config());

        let token = issuer.issue_at(1, "alice", issued_at()).unwrap();

        assert_eq!(
            validator.validate_at(&token, issued_at() - Duration::seconds(1)),
            Err(TokenRejection::NotYetValid)
        );
        assert!(validator.validate_at(&token, issued_at()).is_ok());
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let other = AuthConfig::new(
            b"another_secret_key_at_least_32_bytes".to_vec(),
            "account-service",
            "account-clients",
        )
        .unwrap();
        let token = TokenIssuer::new(other).issue(1, "alice").unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_wrong_algorithm_is_bad_signature() {
        let claims = Claims::for_account(
            1,
            "alice",
            "account-service",
            "account-clients",
            Utc::now(),
            60,
        )
        .unwrap();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_issuer_mismatch() {
        let other = AuthConfig::new(SECRET, "someone-else", "account-clients").unwrap();
        let token = TokenIssuer::new(other).issue(1, "alice").unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::IssuerMismatch));
    }

    #[test]
    fn test_audience_mismatch() {
        let other = AuthConfig::new(SECRET, "account-service", "other-clients").unwrap();
        let token = TokenIssuer::new(other).issue(1, "alice").unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::AudienceMismatch));
    }

    #[test]
    fn test_signature_checked_before_issuer() {
        let other = AuthConfig::new(
            b"another_secret_key_at_least_32_bytes".to_vec(),
            "someone-else",
            "other-clients",
        )
        .unwrap();
        let token = TokenIssuer::new(other).issue(1, "alice").unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_missing_claims_are_malformed() {
        let payload = serde_json::json!({
            "sub": "1",
            "iss": "account-service",
            "aud": "account-clients",
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = TokenValidator::new(config()).validate(&token);
        assert_eq!(result, Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let validator = TokenValidator::new(config());

        assert_eq!(
            validator.validate("invalid.token.here"),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(validator.validate(""), Err(TokenRejection::Malformed));
    }
}
