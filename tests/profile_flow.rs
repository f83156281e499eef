mod common;

use common::{
    FailingCache, InMemoryProfiles, SlowDeleteCache, StalledStore, alice, profile_service,
};
use std::sync::Arc;
use std::time::Duration;
use userinfo::context::RequestContext;
use userinfo::domain::entities::Profile;
use userinfo::error::{AppError, ErrorCode};
use userinfo::infrastructure::cache::{
    CacheService, MemoryCache, NullCache, PROFILE_KEY_PREFIX,
};

fn username_only(username: &str) -> Profile {
    Profile {
        username: username.to_string(),
        ..Profile::default()
    }
}

#[tokio::test]
async fn test_create_get_update_get() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(MemoryCache::new()));
    let ctx = RequestContext::new().with_user(1);

    service.create_profile(&ctx, alice(1)).await.unwrap();

    let created = service.get_profile(&ctx, 1).await.unwrap();
    assert_eq!(created.user_id, 1);
    assert_eq!(created.username, "alice");
    assert_eq!(created.birthday, "1990-05-17");
    assert_eq!(created.email, "alice@x.com");
    assert_eq!(created.avatar_url, "https://cdn.example.com/alice.png");

    service
        .update_profile(&ctx, 1, username_only("bob"))
        .await
        .unwrap();

    let updated = service.get_profile(&ctx, 1).await.unwrap();
    assert_eq!(updated.username, "bob");
    assert_eq!(updated.birthday, created.birthday);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.avatar_url, created.avatar_url);
    assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store, Arc::new(MemoryCache::new()));
    let ctx = RequestContext::new();

    service.create_profile(&ctx, alice(1)).await.unwrap();
    // Warm the cache so a stale entry would be served if delete missed it.
    service.get_profile(&ctx, 1).await.unwrap();

    service.delete_profile(&ctx, 1).await.unwrap();

    let err = service.get_profile(&ctx, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    assert_eq!(err.code(), ErrorCode::ProfileNotFound);
}

#[tokio::test]
async fn test_second_read_is_served_from_cache() {
    let store = Arc::new(InMemoryProfiles::default());
    let cache = Arc::new(MemoryCache::new());
    let service = profile_service(store.clone(), cache.clone());
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();

    let first = service.get_profile(&ctx, 1).await.unwrap();
    let second = service.get_profile(&ctx, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.reads(), 1);
    assert_eq!(cache.len(), 1);
    assert!(
        cache
            .get(&format!("{PROFILE_KEY_PREFIX}1"))
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_write_makes_next_read_see_store() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(MemoryCache::new()));
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();
    service.get_profile(&ctx, 1).await.unwrap();

    service
        .update_profile(&ctx, 1, username_only("carol"))
        .await
        .unwrap();

    // A change made straight to the store after the write is visible on the
    // next miss, since the write dropped the cached entry.
    let mut row = store.row(1).unwrap();
    row.email = "carol@x.com".to_string();
    store.put(row);

    let seen = service.get_profile(&ctx, 1).await.unwrap();
    assert_eq!(seen.username, "carol");
    assert_eq!(seen.email, "carol@x.com");
}

#[tokio::test]
async fn test_empty_fields_never_overwrite_stored_values() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(NullCache::new()));
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();

    let patch = Profile {
        id: 0,
        user_id: 0,
        username: String::new(),
        birthday: String::new(),
        email: "new@x.com".to_string(),
        avatar_url: String::new(),
    };
    service.update_profile(&ctx, 1, patch).await.unwrap();

    let row = store.row(1).unwrap();
    assert_eq!(row.user_id, 1);
    assert_eq!(row.username, "alice");
    assert_eq!(row.birthday, "1990-05-17");
    assert_eq!(row.email, "new@x.com");
    assert_eq!(row.avatar_url, "https://cdn.example.com/alice.png");
}

#[tokio::test]
async fn test_clearing_a_field_is_not_supported() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(NullCache::new()));
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();

    // An all-empty patch is a no-op, not "clear everything".
    service
        .update_profile(&ctx, 1, Profile::default())
        .await
        .unwrap();

    assert_eq!(store.row(1).unwrap().username, "alice");
}

#[tokio::test]
async fn test_malformed_birthday_falls_back_to_epoch() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(NullCache::new()));
    let ctx = RequestContext::new();

    let mut profile = alice(2);
    profile.birthday = "17/05/1990".to_string();
    service.create_profile(&ctx, profile).await.unwrap();

    assert_eq!(store.row(2).unwrap().birthday, "1970-01-01");
}

#[tokio::test]
async fn test_delete_missing_profile_is_success_every_time() {
    let service = profile_service(
        Arc::new(InMemoryProfiles::default()),
        Arc::new(MemoryCache::new()),
    );
    let ctx = RequestContext::new();

    for _ in 0..3 {
        assert!(service.delete_profile(&ctx, 404).await.is_ok());
    }
}

#[tokio::test]
async fn test_create_duplicate_profile() {
    let service = profile_service(
        Arc::new(InMemoryProfiles::default()),
        Arc::new(NullCache::new()),
    );
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();

    let err = service.create_profile(&ctx, alice(1)).await.unwrap_err();

    assert!(matches!(err, AppError::AlreadyExists { .. }));
    assert_eq!(err.code(), ErrorCode::CreateProfileFailed);
}

#[tokio::test]
async fn test_unavailable_cache_degrades_to_store() {
    let store = Arc::new(InMemoryProfiles::default());
    let service = profile_service(store.clone(), Arc::new(FailingCache));
    let ctx = RequestContext::new();

    service.create_profile(&ctx, alice(1)).await.unwrap();
    assert_eq!(service.get_profile(&ctx, 1).await.unwrap().username, "alice");

    service
        .update_profile(&ctx, 1, username_only("bob"))
        .await
        .unwrap();
    assert_eq!(service.get_profile(&ctx, 1).await.unwrap().username, "bob");

    service.delete_profile(&ctx, 1).await.unwrap();
    assert!(matches!(
        service.get_profile(&ctx, 1).await,
        Err(AppError::NotFound { .. })
    ));
    assert_eq!(store.reads(), 3);
}

#[tokio::test]
async fn test_always_missing_cache_gives_same_results() {
    let store = Arc::new(InMemoryProfiles::default());
    let cache: Arc<dyn CacheService> = Arc::new(NullCache::new());
    let service = profile_service(store.clone(), cache);
    let ctx = RequestContext::new();

    service.create_profile(&ctx, alice(1)).await.unwrap();
    service.get_profile(&ctx, 1).await.unwrap();
    service.get_profile(&ctx, 1).await.unwrap();

    assert_eq!(store.reads(), 2);
}

#[tokio::test]
async fn test_malformed_cache_entry_falls_through_to_store() {
    let store = Arc::new(InMemoryProfiles::default());
    let cache = Arc::new(MemoryCache::new());
    let service = profile_service(store.clone(), cache.clone());
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();

    cache
        .set(
            &format!("{PROFILE_KEY_PREFIX}1"),
            "{not json",
            Duration::from_secs(60),
        )
        .await
        .unwrap();

    let profile = service.get_profile(&ctx, 1).await.unwrap();

    assert_eq!(profile.username, "alice");
    assert_eq!(store.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_during_invalidation_keeps_committed_write() {
    let store = Arc::new(InMemoryProfiles::default());
    let cache = Arc::new(SlowDeleteCache::new(Duration::from_millis(300)));
    let service = profile_service(store.clone(), cache);
    let ctx = RequestContext::new();
    service.create_profile(&ctx, alice(1)).await.unwrap();
    service.get_profile(&ctx, 1).await.unwrap();

    let hurried = RequestContext::new().with_timeout(Duration::from_millis(100));
    service
        .update_profile(&hurried, 1, username_only("bob"))
        .await
        .unwrap();

    assert_eq!(store.row(1).unwrap().username, "bob");
    assert_eq!(service.get_profile(&ctx, 1).await.unwrap().username, "bob");
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_hits_deadline() {
    let service = profile_service(Arc::new(StalledStore), Arc::new(MemoryCache::new()));
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(100));

    let read = service.get_profile(&ctx, 1).await.unwrap_err();
    assert!(matches!(read, AppError::DeadlineExceeded { .. }));
    assert_eq!(read.code(), ErrorCode::DeadlineExceeded);

    let write = service
        .update_profile(&ctx, 1, username_only("bob"))
        .await
        .unwrap_err();
    assert_eq!(write.code(), ErrorCode::DeadlineExceeded);
}
