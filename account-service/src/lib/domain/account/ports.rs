use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::HashedPassword;
use crate::account::models::LoginCommand;
use crate::account::models::LoginResult;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::UpdateAccountCommand;
use crate::account::models::Username;

/// Port for registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Created account with its assigned identifier
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `StoreFault` - Persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username, wrong password or unusable
    ///   stored hash; the three are indistinguishable to the caller
    /// * `Token` - Token signing failed
    /// * `StoreFault` - Persistence failed
    async fn login(&self, command: LoginCommand) -> Result<LoginResult, AccountError>;
}

/// Port for account management.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `StoreFault` - Persistence failed
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// # Errors
    /// * `StoreFault` - Persistence failed
    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError>;

    /// Update username, status and/or role.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `UsernameTaken` - New username belongs to another account
    /// * `StoreFault` - Persistence failed
    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `StoreFault` - Persistence failed
    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations must enforce username uniqueness themselves (unique index
/// or equivalent) and report a violation as `UsernameTaken`.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account and assign its identifier.
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already taken
    /// * `StoreFault` - Persistence failed
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;

    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Account>, AccountError>;

    /// Check whether a username is held by any account other than `excluding`.
    async fn username_exists(
        &self,
        username: &Username,
        excluding: Option<AccountId>,
    ) -> Result<bool, AccountError>;

    /// Retrieve all accounts, oldest first.
    async fn list_all(&self) -> Result<Vec<Account>, AccountError>;

    /// Apply the provided fields to an existing account in one atomic write.
    ///
    /// Fields left as `None` keep their stored value, even if a concurrent
    /// update changed them.
    ///
    /// # Returns
    /// The account as stored after the update
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `UsernameTaken` - New username belongs to another account
    /// * `StoreFault` - Persistence failed
    async fn update(
        &self,
        id: &AccountId,
        changes: UpdateAccountCommand,
    ) -> Result<Account, AccountError>;

    /// Replace the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `StoreFault` - Persistence failed
    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &HashedPassword,
    ) -> Result<(), AccountError>;

    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `StoreFault` - Persistence failed
    async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;
}

#[cfg(test)]
pub(crate) mod mocks {
    use mockall::mock;

    use super::*;

    mock! {
        pub Repository {}

        #[async_trait]
        impl AccountRepository for Repository {
            async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AccountError>;
            async fn username_exists(&self, username: &Username, excluding: Option<AccountId>) -> Result<bool, AccountError>;
            async fn list_all(&self) -> Result<Vec<Account>, AccountError>;
            async fn update(&self, id: &AccountId, changes: UpdateAccountCommand) -> Result<Account, AccountError>;
            async fn update_password_hash(&self, id: &AccountId, password_hash: &HashedPassword) -> Result<(), AccountError>;
            async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;
        }
    }
}
