use std::fmt;

use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;

use crate::account::errors::AccountIdError;
use crate::account::errors::AccountTagError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;

/// Account aggregate entity.
///
/// The password hash is opaque; it never leaves the domain and outbound
/// layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub password_hash: HashedPassword,
    pub status: AccountTag,
    pub role: AccountTag,
    pub created_at: DateTime<Utc>,
}

/// Account data before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: Username,
    pub password_hash: HashedPassword,
    pub status: AccountTag,
    pub role: AccountTag,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// New account with default status and role, created now.
    ///
    /// The timestamp is truncated to microseconds, the precision the store keeps.
    pub fn new(username: Username, password_hash: HashedPassword) -> Self {
        Self {
            username,
            password_hash,
            status: AccountTag::default_status(),
            role: AccountTag::default_role(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            status: self.status,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Account unique identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Parse an account ID from its decimal string form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(AccountId(id)),
            _ => Err(AccountIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Always stored trimmed. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub const MAX_LENGTH: usize = 100;

    /// Create a new valid username.
    ///
    /// Leading and trailing whitespace is removed before validation.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 100 characters after trimming
    pub fn new(username: impl AsRef<str>) -> Result<Self, UsernameError> {
        let trimmed = username.as_ref().trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Not trimmed: surrounding whitespace is part of the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `Empty` - Password is empty or only whitespace
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.trim().is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        Ok(Self(password))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Stored password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

/// Free-form account tag, used for status and role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTag(String);

impl AccountTag {
    pub const DEFAULT_STATUS: &'static str = "active";
    pub const DEFAULT_ROLE: &'static str = "user";

    /// # Errors
    /// * `Empty` - Nothing left after trimming
    pub fn new(tag: impl AsRef<str>) -> Result<Self, AccountTagError> {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountTagError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn default_status() -> Self {
        Self(Self::DEFAULT_STATUS.to_string())
    }

    pub fn default_role() -> Self {
        Self(Self::DEFAULT_ROLE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

/// Raw login attempt.
///
/// Left unvalidated on purpose: a malformed username must fail exactly like
/// an unknown one.
#[derive(Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login: a bearer token for the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub token: String,
    pub username: Username,
}

/// Command to update an existing account.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountCommand {
    pub username: Option<Username>,
    pub status: Option<AccountTag>,
    pub role: Option<AccountTag>,
}
