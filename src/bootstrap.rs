//! Startup wiring: pools, migrations, cache, and services.

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AccountService, ProfileService};
use crate::application::session::SessionAuthority;
use crate::config::{Config, mask_connection_string};
use crate::infrastructure::CachedProfileRepository;
use crate::infrastructure::cache::{CacheService, NullCache, ProfileCachePolicy, RedisCache};
use crate::infrastructure::persistence::{PgAccountRepository, PgProfileStore};
use crate::state::AppState;

/// Opens a pool against `url` with the configured limits.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect_pool(url: &str, config: &Config) -> Result<PgPool> {
    tracing::info!(
        url = %mask_connection_string(url),
        max_connections = config.db_max_connections,
        "Connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(url)))
}

/// Applies pending migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate")?;
    tracing::info!("Migrations applied");
    Ok(())
}

/// Connects to Redis when configured, falling back to [`NullCache`].
///
/// An unreachable Redis disables caching instead of failing startup.
pub async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_op_timeout()).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Connects every backing resource and wires the services.
///
/// Migrations are not run here; see [`migrate`].
///
/// # Errors
///
/// Returns an error if the primary or replica database is unreachable.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let primary = Arc::new(connect_pool(&config.database_url, config).await?);
    let replica = if config.has_replica() {
        Arc::new(connect_pool(&config.replica_database_url, config).await?)
    } else {
        primary.clone()
    };

    let cache = connect_cache(config).await;

    let sessions = SessionAuthority::new(
        config.session_signing_secret.as_bytes(),
        config.session_lifetime(),
    );
    let accounts = AccountService::new(
        Arc::new(PgAccountRepository::new(primary.clone())),
        sessions,
    );

    let policy = ProfileCachePolicy::new(
        config.profile_cache_ttl(),
        config.profile_cache_ttl_jitter(),
    );
    let store = Arc::new(PgProfileStore::new(primary, replica));
    let profiles = ProfileService::new(Arc::new(CachedProfileRepository::new(
        store, cache, policy,
    )));

    Ok(AppState {
        accounts: Arc::new(accounts),
        profiles: Arc::new(profiles),
        request_timeout: config.request_timeout(),
    })
}
