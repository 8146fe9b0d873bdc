use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountTag;
use crate::account::models::HashedPassword;
use crate::account::models::NewAccount;
use crate::account::models::UpdateAccountCommand;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

const USERNAME_CONSTRAINT: &str = "accounts_username_key";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password_hash: String,
    status: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            password_hash: HashedPassword::new(row.password_hash),
            status: AccountTag::new(row.status)?,
            role: AccountTag::new(row.role)?,
            created_at: row.created_at,
        })
    }
}

/// Map a write failure, turning the username unique violation into a conflict.
fn write_error(e: sqlx::Error, username: &Username) -> AccountError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT) {
            return AccountError::UsernameTaken(username.to_string());
        }
    }
    AccountError::StoreFault(e.to_string())
}

fn store_error(e: sqlx::Error) -> AccountError {
    AccountError::StoreFault(e.to_string())
}

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (username, password_hash, status, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.status.as_str())
        .bind(account.role.as_str())
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &account.username))?;

        Ok(account.with_id(AccountId(id)))
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, status, role, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, status, role, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn username_exists(
        &self,
        username: &Username,
        excluding: Option<AccountId>,
    ) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM accounts
                WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username.as_str())
        .bind(excluding.map(|id| id.0))
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, status, role, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn update(
        &self,
        id: &AccountId,
        changes: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET username = COALESCE($2, username),
                status = COALESCE($3, status),
                role = COALESCE($4, role)
            WHERE id = $1
            RETURNING id, username, password_hash, status, role, created_at
            "#,
        )
        .bind(id.0)
        .bind(changes.username.as_ref().map(Username::as_str))
        .bind(changes.status.as_ref().map(AccountTag::as_str))
        .bind(changes.role.as_ref().map(AccountTag::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &changes.username {
            Some(username) => write_error(e, username),
            None => store_error(e),
        })?;

        row.map(Account::try_from)
            .transpose()?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &HashedPassword,
    ) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
