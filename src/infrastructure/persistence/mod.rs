//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters throughout.
//!
//! # Repositories
//!
//! - [`PgAccountRepository`] - Account credentials (primary only)
//! - [`PgProfileStore`] - Profile rows (replica reads, primary writes)

pub mod pg_account_repository;
pub mod pg_profile_store;
pub mod profile_sql;

pub use pg_account_repository::PgAccountRepository;
pub use pg_profile_store::PgProfileStore;
