//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete types in the infrastructure layer.
//!
//! # Architecture
//!
//! - [`AccountRepository`] - Credential lookups and inserts against the primary
//! - [`ProfileStore`] - Narrow row-store capability for profiles
//!   (replica reads, primary writes)
//! - [`ProfileRepository`] - Profile access as seen by services; implemented by
//!   [`crate::infrastructure::CachedProfileRepository`]
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Testing
//!
//! See `tests/repository_*.rs` for PostgreSQL-backed tests and
//! `tests/common/mod.rs` for in-memory stand-ins.

pub mod account_repository;
pub mod profile_repository;
pub mod profile_store;

pub use account_repository::AccountRepository;
pub use profile_repository::ProfileRepository;
pub use profile_store::ProfileStore;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
#[cfg(test)]
pub use profile_store::MockProfileStore;

use crate::context::DeadlineExceeded;
use thiserror::Error;

/// Storage outcomes surfaced by repositories.
///
/// `NotFound` is an expected outcome, distinct from a store failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violation ({})", .constraint.as_deref().unwrap_or("unknown"))]
    Conflict { constraint: Option<String> },
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }

        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return Self::Conflict {
                constraint: db.constraint().map(str::to_owned),
            };
        }

        Self::Store(e)
    }
}
