//! Repository trait for account credentials.

use super::RepositoryError;
use crate::domain::entities::{Account, NewAccount};
use async_trait::async_trait;

/// Repository interface for the credential store.
///
/// Reads and writes always go to the primary and are never cached, so logins
/// see the freshest password and status.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccountRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by its email.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Account))` if found
    /// - `Ok(None)` if no account uses this email
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;

    /// Inserts a new account and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the email is already taken.
    /// Returns [`RepositoryError::Store`] on database errors.
    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError>;
}
