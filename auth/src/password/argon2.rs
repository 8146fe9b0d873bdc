use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as HashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Outcome of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerification {
    /// Password matches and the hash uses the current parameters.
    Match,
    /// Password does not match.
    Mismatch,
    /// Password matches, but the hash was produced with another algorithm or
    /// cost parameters and should be replaced.
    NeedsRehash,
}

impl PasswordVerification {
    pub fn is_match(&self) -> bool {
        !matches!(self, PasswordVerification::Mismatch)
    }
}

/// Password hashing implementation.
///
/// Argon2id with a fresh random salt per call. The salt, algorithm and cost
/// parameters are embedded in the PHC string output, so two hashes of the same
/// password differ.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a new password hasher with the Argon2 default cost parameters.
    pub fn new() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// Hashes made with different parameters still verify, but report
    /// [`PasswordVerification::NeedsRehash`].
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Create a password hasher from raw Argon2 costs.
    ///
    /// # Arguments
    /// * `m_cost` - Memory size in KiB
    /// * `t_cost` - Number of iterations
    /// * `p_cost` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParams` - Costs are outside the ranges Argon2 accepts
    pub fn with_cost(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        Params::new(m_cost, t_cost, p_cost, None)
            .map(Self::with_params)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The final output comparison is constant-time (performed by the
    /// `password-hash` output type), so timing does not depend on where a
    /// mismatch occurs.
    ///
    /// # Arguments
    /// * `hash` - Stored password hash in PHC string format
    /// * `password` - Plaintext password to verify
    ///
    /// # Errors
    /// * `Unverifiable` - Stored hash is malformed or uses unsupported parameters
    pub fn verify(
        &self,
        hash: &str,
        password: &str,
    ) -> Result<PasswordVerification, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::Unverifiable(e.to_string()))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) if self.is_current(&parsed_hash) => Ok(PasswordVerification::Match),
            Ok(()) => Ok(PasswordVerification::NeedsRehash),
            Err(HashError::Password) => Ok(PasswordVerification::Mismatch),
            Err(e) => Err(PasswordError::Unverifiable(e.to_string())),
        }
    }

    fn is_current(&self, parsed_hash: &PasswordHash<'_>) -> bool {
        if parsed_hash.algorithm != Algorithm::Argon2id.ident() {
            return false;
        }

        match Params::try_from(parsed_hash) {
            Ok(params) => {
                params.m_cost() == self.params.m_cost()
                    && params.t_cost() == self.params.t_cost()
                    && params.p_cost() == self.params.p_cost()
            }
            Err(_) => false,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
