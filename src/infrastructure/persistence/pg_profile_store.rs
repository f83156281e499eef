//! PostgreSQL implementation of the profile row store.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::{debug, error};

use super::profile_sql::{insert_statement, update_statement};
use crate::domain::entities::{Profile, ProfileChanges};
use crate::domain::repositories::{ProfileStore, RepositoryError};

#[derive(FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    username: String,
    birthday: Option<NaiveDate>,
    email: String,
    avatar_url: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            birthday: Profile::format_birthday(row.birthday),
            email: row.email,
            avatar_url: row.avatar_url,
        }
    }
}

/// Profile storage split across a primary and a read replica.
///
/// Reads go to `replica` and may lag the primary; writes always go to
/// `primary`. Both pools may point at the same server.
pub struct PgProfileStore {
    primary: Arc<PgPool>,
    replica: Arc<PgPool>,
}

impl PgProfileStore {
    /// Creates a store over a primary pool and a replica pool.
    pub fn new(primary: Arc<PgPool>, replica: Arc<PgPool>) -> Self {
        Self { primary, replica }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, username, birthday, email, avatar_url
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.replica.as_ref())
        .await
        .inspect_err(|e| error!(user_id, error = %e, "Replica read failed"))?;

        Ok(row.map(Profile::from))
    }

    async fn insert(&self, changes: &ProfileChanges) -> Result<(), RepositoryError> {
        let mut statement = insert_statement(changes);
        debug!(sql = statement.sql(), "Inserting profile");

        statement
            .build()
            .execute(self.primary.as_ref())
            .await
            .inspect_err(|e| error!(error = %e, "Profile insert failed"))?;

        Ok(())
    }

    async fn update(
        &self,
        user_id: i64,
        changes: &ProfileChanges,
    ) -> Result<u64, RepositoryError> {
        if changes.is_empty() {
            return Ok(0);
        }

        let mut statement = update_statement(user_id, changes);
        debug!(sql = statement.sql(), "Updating profile");

        let result = statement
            .build()
            .execute(self.primary.as_ref())
            .await
            .inspect_err(|e| error!(user_id, error = %e, "Profile update failed"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(self.primary.as_ref())
            .await
            .inspect_err(|e| error!(user_id, error = %e, "Profile delete failed"))?;

        Ok(result.rows_affected())
    }
}
