//! Repository trait for profile access as seen by the service layer.

use super::RepositoryError;
use crate::context::RequestContext;
use crate::domain::entities::Profile;
use async_trait::async_trait;

/// Profile CRUD keyed by user id.
///
/// Store and cache calls are bounded by the deadline of `ctx`; work that
/// follows a committed write is not.
///
/// # Implementations
///
/// - [`crate::infrastructure::CachedProfileRepository`] - cache-aside over a
///   [`super::ProfileStore`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetches the profile for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no profile exists.
    /// Returns [`RepositoryError::Store`] on database errors.
    /// Returns [`RepositoryError::Deadline`] if `ctx` runs out of time.
    async fn get(&self, ctx: &RequestContext, user_id: i64) -> Result<Profile, RepositoryError>;

    /// Creates a profile.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] on a duplicate row.
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn create(&self, ctx: &RequestContext, profile: Profile) -> Result<(), RepositoryError>;

    /// Applies the non-empty fields of `patch` to the profile of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn update(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        patch: Profile,
    ) -> Result<(), RepositoryError>;

    /// Deletes the profile of `user_id`. Deleting a missing profile succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn delete(&self, ctx: &RequestContext, user_id: i64) -> Result<(), RepositoryError>;
}
