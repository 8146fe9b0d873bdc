use std::sync::Arc;

use async_trait::async_trait;

use crate::account::credentials::CredentialStore;
use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::UpdateAccountCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service for account management.
///
/// Renames go through [`CredentialStore`] so they obey the same uniqueness
/// rule as registration.
pub struct AccountService<R>
where
    R: AccountRepository,
{
    credentials: CredentialStore<R>,
    repository: Arc<R>,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&repository)),
            repository,
        }
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: AccountRepository,
{
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.repository.list_all().await
    }

    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        // Absent accounts report NotFound before any username conflict
        self.get_account(id).await?;

        let updated = self.credentials.save(id, command).await?;

        tracing::info!(
            account_id = %updated.id,
            username = %updated.username,
            status = %updated.status,
            role = %updated.role,
            "Account updated"
        );

        Ok(updated)
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError> {
        self.repository.delete(id).await?;

        // Outstanding tokens for this account stay valid until they expire
        tracing::info!(account_id = %id, "Account deleted");

        Ok(())
    }
}
