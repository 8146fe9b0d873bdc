use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::HashedPassword;
use crate::account::models::NewAccount;
use crate::account::models::UpdateAccountCommand;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

#[derive(Debug)]
struct Accounts {
    /// Keyed by id, so iteration is in creation order
    by_id: BTreeMap<i64, Account>,
    next_id: i64,
}

impl Accounts {
    fn holder_of(&self, username: &Username) -> Option<AccountId> {
        self.by_id
            .values()
            .find(|account| &account.username == username)
            .map(|account| account.id)
    }
}

/// Process-local account store.
///
/// Every write takes the single write lock, so the username check and the
/// insert or rename form one atomic step.
#[derive(Debug)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Accounts>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Accounts {
                by_id: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.holder_of(&account.username).is_some() {
            return Err(AccountError::UsernameTaken(account.username.to_string()));
        }

        let id = AccountId(accounts.next_id);
        accounts.next_id += 1;

        let created = account.with_id(id);
        accounts.by_id.insert(id.0, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.by_id.get(&id.0).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .holder_of(username)
            .and_then(|id| accounts.by_id.get(&id.0).cloned()))
    }

    async fn username_exists(
        &self,
        username: &Username,
        excluding: Option<AccountId>,
    ) -> Result<bool, AccountError> {
        let accounts = self.accounts.read().await;
        Ok(matches!(accounts.holder_of(username), Some(holder) if Some(holder) != excluding))
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.accounts.read().await.by_id.values().cloned().collect())
    }

    async fn update(
        &self,
        id: &AccountId,
        changes: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if let Some(username) = &changes.username {
            if let Some(holder) = accounts.holder_of(username) {
                if holder != *id {
                    return Err(AccountError::UsernameTaken(username.to_string()));
                }
            }
        }

        let stored = accounts
            .by_id
            .get_mut(&id.0)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        if let Some(username) = changes.username {
            stored.username = username;
        }
        if let Some(status) = changes.status {
            stored.status = status;
        }
        if let Some(role) = changes.role {
            stored.role = role;
        }

        Ok(stored.clone())
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &HashedPassword,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .by_id
            .get_mut(&id.0)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;

        stored.password_hash = password_hash.clone();
        Ok(())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        self.accounts
            .write()
            .await
            .by_id
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }
}
