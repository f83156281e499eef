#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;
use userinfo::application::services::{AccountService, ProfileService};
use userinfo::application::session::SessionAuthority;
use userinfo::domain::entities::{Account, NewAccount, Profile, ProfileChanges, ProfileField};
use userinfo::domain::repositories::{AccountRepository, ProfileStore, RepositoryError};
use userinfo::infrastructure::CachedProfileRepository;
use userinfo::infrastructure::cache::{
    CacheError, CacheResult, CacheService, MemoryCache, ProfileCachePolicy,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub fn sessions() -> SessionAuthority {
    SessionAuthority::new(TEST_SECRET, ChronoDuration::hours(24))
}

/// Account store keyed by email with sequential ids.
#[derive(Default)]
pub struct InMemoryAccounts {
    by_email: DashMap<String, Account>,
    next_id: AtomicI64,
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.by_email.get(email).map(|a| a.clone()))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict {
                constraint: Some("accounts_email_key".to_string()),
            }),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                let stored = Account::new(id, account.email, account.password, account.status);
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }
}

/// Profile rows keyed by user id, counting reads so tests can tell cache
/// hits from store reads.
#[derive(Default)]
pub struct InMemoryProfiles {
    rows: DashMap<i64, Profile>,
    next_id: AtomicI64,
    reads: AtomicUsize,
}

impl InMemoryProfiles {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn row(&self, user_id: i64) -> Option<Profile> {
        self.rows.get(&user_id).map(|p| p.clone())
    }

    /// Writes a row directly, bypassing the repository and its cache.
    pub fn put(&self, profile: Profile) {
        self.rows.insert(profile.user_id, profile);
    }

    fn apply(profile: &mut Profile, changes: &ProfileChanges) {
        for field in changes.fields() {
            match field {
                ProfileField::Id(id) => profile.id = *id,
                ProfileField::UserId(user_id) => profile.user_id = *user_id,
                ProfileField::Username(v) => profile.username = v.clone(),
                ProfileField::Birthday(d) => profile.birthday = format_date(*d),
                ProfileField::Email(v) => profile.email = v.clone(),
                ProfileField::AvatarUrl(v) => profile.avatar_url = v.clone(),
            }
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    Profile::format_birthday(Some(date))
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.row(user_id))
    }

    async fn insert(&self, changes: &ProfileChanges) -> Result<(), RepositoryError> {
        let mut profile = Profile::default();
        Self::apply(&mut profile, changes);
        if profile.id == 0 {
            profile.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        }

        match self.rows.entry(profile.user_id) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict {
                constraint: Some("profiles_user_id_key".to_string()),
            }),
            Entry::Vacant(slot) => {
                slot.insert(profile);
                Ok(())
            }
        }
    }

    async fn update(&self, user_id: i64, changes: &ProfileChanges) -> Result<u64, RepositoryError> {
        match self.rows.get_mut(&user_id) {
            Some(mut row) if !changes.is_empty() => {
                Self::apply(&mut row, changes);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete(&self, user_id: i64) -> Result<u64, RepositoryError> {
        Ok(self.rows.remove(&user_id).map_or(0, |_| 1))
    }
}

/// Cache whose every operation fails, as if the cluster were down.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("cache down".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::ConnectionError("cache down".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Timeout(Duration::from_millis(500)))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// In-memory cache whose deletes take `delay` before they land.
pub struct SlowDeleteCache {
    pub inner: MemoryCache,
    pub delay: Duration,
}

impl SlowDeleteCache {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryCache::new(),
            delay,
        }
    }
}

#[async_trait]
impl CacheService for SlowDeleteCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Store that never answers, as if the database were hung.
pub struct StalledStore;

async fn stall<T>() -> T {
    std::future::pending().await
}

#[async_trait]
impl AccountRepository for StalledStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, RepositoryError> {
        stall().await
    }

    async fn insert(&self, _account: NewAccount) -> Result<Account, RepositoryError> {
        stall().await
    }
}

#[async_trait]
impl ProfileStore for StalledStore {
    async fn find_by_user_id(&self, _user_id: i64) -> Result<Option<Profile>, RepositoryError> {
        stall().await
    }

    async fn insert(&self, _changes: &ProfileChanges) -> Result<(), RepositoryError> {
        stall().await
    }

    async fn update(
        &self,
        _user_id: i64,
        _changes: &ProfileChanges,
    ) -> Result<u64, RepositoryError> {
        stall().await
    }

    async fn delete(&self, _user_id: i64) -> Result<u64, RepositoryError> {
        stall().await
    }
}

pub fn account_service<R: AccountRepository>(accounts: Arc<R>) -> AccountService<R> {
    AccountService::new(accounts, sessions())
}

pub fn profile_service<S: ProfileStore>(
    store: Arc<S>,
    cache: Arc<dyn CacheService>,
) -> ProfileService<CachedProfileRepository<S>> {
    ProfileService::new(Arc::new(CachedProfileRepository::new(
        store,
        cache,
        ProfileCachePolicy::default(),
    )))
}

pub fn alice(user_id: i64) -> Profile {
    Profile {
        user_id,
        username: "alice".to_string(),
        birthday: "1990-05-17".to_string(),
        email: "alice@x.com".to_string(),
        avatar_url: "https://cdn.example.com/alice.png".to_string(),
        ..Profile::default()
    }
}
