//! Row-store capability for profiles.

use super::RepositoryError;
use crate::domain::entities::{Profile, ProfileChanges};
use async_trait::async_trait;

/// Narrow row-store interface behind the cached profile repository.
///
/// Reads may be served by a lagging read replica; every write targets the
/// primary.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProfileStore`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Reads a profile by exact user id from the replica.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepositoryError>;

    /// Inserts a row carrying exactly the present fields.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] on a duplicate row.
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn insert(&self, changes: &ProfileChanges) -> Result<(), RepositoryError>;

    /// Sets exactly the present fields on the row keyed by `user_id`.
    ///
    /// Returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn update(&self, user_id: i64, changes: &ProfileChanges)
    -> Result<u64, RepositoryError>;

    /// Deletes the row keyed by `user_id`, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn delete(&self, user_id: i64) -> Result<u64, RepositoryError>;
}
