use std::sync::Arc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::UpdateAccountCommand;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

/// Username uniqueness guard in front of the account repository.
///
/// The pre-check only gives a fast, friendly answer. Two writers can both pass
/// it; the repository's unique index decides, and reports the loser with the
/// same `UsernameTaken` error.
pub struct CredentialStore<R>
where
    R: AccountRepository,
{
    repository: Arc<R>,
}

impl<R> CredentialStore<R>
where
    R: AccountRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Check that `candidate` is free for use.
    ///
    /// # Arguments
    /// * `candidate` - Normalized username
    /// * `excluding` - Account allowed to already hold the name (rename case)
    ///
    /// # Errors
    /// * `UsernameTaken` - Another account holds the username
    /// * `StoreFault` - Persistence failed
    pub async fn reserve_username(
        &self,
        candidate: &Username,
        excluding: Option<AccountId>,
    ) -> Result<(), AccountError> {
        if self.repository.username_exists(candidate, excluding).await? {
            tracing::debug!(username = %candidate, "Username already taken");
            return Err(AccountError::UsernameTaken(candidate.to_string()));
        }
        Ok(())
    }

    /// Apply changes to an existing account, checking a new username first.
    pub async fn save(
        &self,
        id: &AccountId,
        changes: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        if let Some(username) = &changes.username {
            self.reserve_username(username, Some(*id)).await?;
        }
        self.repository.update(id, changes).await
    }
}
