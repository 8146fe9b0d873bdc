//! Credential and token primitives
//!
//! Provides the building blocks for account authentication:
//! - Password hashing (Argon2id) with match / mismatch / needs-rehash outcomes
//! - Signed, expiring bearer tokens (JWT, HS256)
//! - A framework-neutral bearer gate for protected operations
//!
//! Everything is constructed explicitly from an immutable [`AuthConfig`];
//! there is no global state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let outcome = hasher.verify(&hash, "my_password").unwrap();
//! assert!(outcome.is_match());
//! ```
//!
//! ## Issuing and Validating Tokens
//! ```
//! use auth::{AuthConfig, TokenIssuer, TokenValidator};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!", "my-service", "my-clients")
//!     .unwrap()
//!     .with_token_lifetime(30)
//!     .unwrap();
//!
//! let issuer = TokenIssuer::new(config.clone());
//! let validator = TokenValidator::new(config);
//!
//! let token = issuer.issue(42, "alice").unwrap();
//! let identity = validator.validate(&token).unwrap();
//! assert_eq!(identity.subject, "42");
//! assert_eq!(identity.display_name, "alice");
//! ```
//!
//! ## Guarding a Request
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthConfig, BearerGate, GateRejection, TokenValidator};
//!
//! let config = AuthConfig::new("secret_key_at_least_32_bytes_long!", "my-service", "my-clients")
//!     .unwrap();
//! let gate = BearerGate::new(Arc::new(TokenValidator::new(config)));
//!
//! assert_eq!(gate.authorize(None), Err(GateRejection::MissingCredentials));
//! ```

pub mod config;
pub mod gate;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use config::AuthConfig;
pub use config::ConfigError;
pub use gate::BearerGate;
pub use gate::GateRejection;
pub use jwt::AuthenticatedIdentity;
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenRejection;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordVerification;
