//! Caching layer for profile reads.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache for tests and embedders
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! [`ProfileCachePolicy`] owns the key layout and the jittered expiry.

mod memory_cache;
mod null_cache;
mod policy;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use policy::{PROFILE_KEY_PREFIX, ProfileCachePolicy};
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
