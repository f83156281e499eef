//! Cache-aside profile repository with invalidate-on-write.
//!
//! Reads try the cache first and fall back to the store on a miss, a cache
//! failure, or an undecodable payload; the fetched profile is then written
//! back with a jittered expiry. Writes go to the store first and, only if the
//! store accepted them, delete the cache entry so the next read repopulates
//! from the source of truth.
//!
//! Cache failures are absorbed here and never reach callers. If an
//! invalidation is lost, the stale entry survives until its expiry.
//!
//! The request deadline bounds the store calls and the cache read. Once a
//! write has committed, the invalidation runs to completion under the cache's
//! own per-command timeout, so a late deadline can neither turn a committed
//! write into a failure nor leave the old entry in place.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context::RequestContext;
use crate::domain::entities::{Profile, ProfileChanges};
use crate::domain::repositories::{ProfileRepository, ProfileStore, RepositoryError};
use crate::infrastructure::cache::{CacheService, ProfileCachePolicy};

/// Profile repository orchestrating a [`ProfileStore`] and a [`CacheService`].
pub struct CachedProfileRepository<S: ProfileStore> {
    store: Arc<S>,
    cache: Arc<dyn CacheService>,
    policy: ProfileCachePolicy,
}

impl<S: ProfileStore> CachedProfileRepository<S> {
    /// Creates a new repository.
    pub fn new(store: Arc<S>, cache: Arc<dyn CacheService>, policy: ProfileCachePolicy) -> Self {
        Self {
            store,
            cache,
            policy,
        }
    }

    async fn read_cached(
        &self,
        ctx: &RequestContext,
        key: &str,
    ) -> Result<Option<Profile>, RepositoryError> {
        let cached = match ctx.bounded("cache_get", self.cache.get(key)).await? {
            Ok(Some(payload)) => match serde_json::from_str::<Profile>(&payload) {
                Ok(profile) => {
                    metrics::counter!("profile_cache_hits_total").increment(1);
                    debug!(key, "Profile cache HIT");
                    Some(profile)
                }
                Err(e) => {
                    metrics::counter!("profile_cache_errors_total").increment(1);
                    warn!(key, error = %e, "Malformed cached profile, reading store");
                    None
                }
            },
            Ok(None) => {
                metrics::counter!("profile_cache_misses_total").increment(1);
                debug!(key, "Profile cache MISS");
                None
            }
            Err(e) => {
                metrics::counter!("profile_cache_errors_total").increment(1);
                warn!(key, error = %e, "Profile cache read failed, reading store");
                None
            }
        };

        Ok(cached)
    }

    async fn populate(&self, key: &str, profile: &Profile) {
        let payload = match serde_json::to_string(profile) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Could not serialize profile, skipping cache write");
                return;
            }
        };

        let ttl = self.policy.ttl();
        match self.cache.set(key, &payload, ttl).await {
            Ok(()) => debug!(key, ttl_seconds = ttl.as_secs(), "Profile cached"),
            Err(e) => {
                metrics::counter!("profile_cache_errors_total").increment(1);
                warn!(key, error = %e, "Profile cache write failed");
            }
        }
    }

    async fn invalidate(&self, user_id: i64) {
        let key = self.policy.key(user_id);
        match self.cache.delete(&key).await {
            Ok(()) => debug!(key, "Profile cache entry invalidated"),
            Err(e) => {
                metrics::counter!("profile_cache_invalidation_failures_total").increment(1);
                warn!(
                    key,
                    error = %e,
                    "Profile cache invalidation failed, stale entry lives until expiry"
                );
            }
        }
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileRepository for CachedProfileRepository<S> {
    async fn get(&self, ctx: &RequestContext, user_id: i64) -> Result<Profile, RepositoryError> {
        let key = self.policy.key(user_id);

        if let Some(profile) = self.read_cached(ctx, &key).await? {
            return Ok(profile);
        }

        let profile = ctx
            .bounded("store_find", self.store.find_by_user_id(user_id))
            .await??
            .ok_or(RepositoryError::NotFound)?;

        self.populate(&key, &profile).await;

        Ok(profile)
    }

    async fn create(&self, ctx: &RequestContext, profile: Profile) -> Result<(), RepositoryError> {
        let changes = ProfileChanges::for_insert(&profile);
        ctx.bounded("store_insert", self.store.insert(&changes)).await??;

        info!(user_id = profile.user_id, "Profile created");
        Ok(())
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        patch: Profile,
    ) -> Result<(), RepositoryError> {
        let changes = ProfileChanges::for_update(&patch);
        let affected = ctx
            .bounded("store_update", self.store.update(user_id, &changes))
            .await??;

        info!(user_id, fields = ?changes.columns(), affected, "Profile updated");
        self.invalidate(user_id).await;
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, user_id: i64) -> Result<(), RepositoryError> {
        let affected = ctx
            .bounded("store_delete", self.store.delete(user_id))
            .await??;

        info!(user_id, affected, "Profile deleted");
        self.invalidate(user_id).await;
        Ok(())
    }
}
