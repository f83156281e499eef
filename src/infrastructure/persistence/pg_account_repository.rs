//! PostgreSQL implementation of the account repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Account, NewAccount};
use crate::domain::repositories::{AccountRepository, RepositoryError};

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password: String,
    status: i16,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::new(row.id, row.email, row.password, row.status)
    }
}

/// PostgreSQL repository for account credentials. Primary only.
pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password, status
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Account::from))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, password, status)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, status
            "#,
        )
        .bind(account.email)
        .bind(account.password)
        .bind(account.status)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Account::from(row))
    }
}
