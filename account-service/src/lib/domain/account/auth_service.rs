use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::PasswordVerification;
use auth::TokenIssuer;
use tokio::sync::OnceCell;

use crate::account::credentials::CredentialStore;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::HashedPassword;
use crate::account::models::LoginCommand;
use crate::account::models::LoginResult;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;

/// Hashed once and verified against when a login names an unknown account.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Domain service for registration and login.
///
/// Argon2 work runs on the blocking thread pool. Logins for unknown usernames
/// still run one verification, against a decoy hash, so response time does
/// not reveal whether an account exists.
pub struct AuthService<R>
where
    R: AccountRepository,
{
    credentials: CredentialStore<R>,
    repository: Arc<R>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
    decoy_hash: OnceCell<HashedPassword>,
}

impl<R> AuthService<R>
where
    R: AccountRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Hasher used for new and upgraded hashes
    /// * `token_issuer` - Issuer for login tokens
    pub fn new(
        repository: Arc<R>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&repository)),
            repository,
            password_hasher,
            token_issuer,
            decoy_hash: OnceCell::new(),
        }
    }

    async fn hash_password(&self, password: String) -> Result<HashedPassword, AccountError> {
        let hasher = Arc::clone(&self.password_hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))??;

        Ok(HashedPassword::new(hash))
    }

    async fn verify_password(
        &self,
        hash: &HashedPassword,
        password: String,
    ) -> Result<Result<PasswordVerification, auth::PasswordError>, AccountError> {
        let hasher = Arc::clone(&self.password_hasher);
        let hash = hash.as_str().to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password verification task failed: {}", e)))
    }

    /// Burn the same Argon2 work a real verification would.
    async fn verify_decoy(&self, password: String) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await;

        match decoy {
            Ok(hash) => {
                let _ = self.verify_password(hash, password).await;
            }
            Err(e) => tracing::warn!(error = %e, "Decoy password hashing failed"),
        }
    }

    /// Replace an outdated hash after a successful login. Failures only log.
    async fn upgrade_hash(&self, account: &Account, password: String) {
        let rehashed = match self.hash_password(password).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "Password rehash failed");
                return;
            }
        };

        match self
            .repository
            .update_password_hash(&account.id, &rehashed)
            .await
        {
            Ok(()) => tracing::info!(account_id = %account.id, "Password hash upgraded"),
            Err(e) => {
                tracing::warn!(account_id = %account.id, error = %e, "Failed to store upgraded password hash")
            }
        }
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        let RegisterCommand { username, password } = command;

        self.credentials.reserve_username(&username, None).await?;

        let password_hash = self.hash_password(password.into_inner()).await?;
        let account = self
            .repository
            .create(NewAccount::new(username, password_hash))
            .await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Account registered"
        );

        Ok(account)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginResult, AccountError> {
        let LoginCommand { username, password } = command;

        // A username that cannot exist fails exactly like an unknown one
        let username = Username::new(&username).map_err(|_| AccountError::InvalidCredentials)?;

        let account = match self.repository.find_by_username(&username).await? {
            Some(account) => account,
            None => {
                self.verify_decoy(password).await;
                tracing::info!(username = %username, "Login rejected: unknown username");
                return Err(AccountError::InvalidCredentials);
            }
        };

        match self
            .verify_password(&account.password_hash, password.clone())
            .await?
        {
            Ok(PasswordVerification::Match) => {}
            Ok(PasswordVerification::NeedsRehash) => self.upgrade_hash(&account, password).await,
            Ok(PasswordVerification::Mismatch) => {
                tracing::info!(account_id = %account.id, "Login rejected: wrong password");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "Login rejected: stored password hash is unverifiable"
                );
                return Err(AccountError::InvalidCredentials);
            }
        }

        let token = self
            .token_issuer
            .issue(account.id, account.username.as_str())?;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(LoginResult {
            token,
            username: account.username,
        })
    }
}
