//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis, in-memory and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`cached_profile_repository`] - Cache-aside orchestration over the profile store

pub mod cache;
pub mod cached_profile_repository;
pub mod persistence;

pub use cached_profile_repository::CachedProfileRepository;
