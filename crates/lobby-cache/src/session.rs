//! Identity session cache with lazy expiry and an explicit sweep.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::debug;
use uuid::Uuid;

use lobby_core::config::CacheConfig;
use lobby_entity::User;

/// Time-bounded map from identity to its cached record.
///
/// Expired entries are never served but stay resident until maintenance
/// runs. The cache owns no timer; `sweep` is driven by the scheduler.
#[derive(Debug, Clone)]
pub struct SessionCache {
    cache: Cache<Uuid, User>,
    ttl: Duration,
    /// Entries dropped for expiry since the last sweep.
    expired: Arc<AtomicUsize>,
}

impl SessionCache {
    /// Create a cache whose entries live for `ttl` after each `put`.
    pub fn new(ttl: Duration) -> Self {
        let expired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&expired);

        let cache = Cache::builder()
            .time_to_live(ttl)
            .eviction_listener(move |_id, _user, cause| {
                if cause == RemovalCause::Expired {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })
            .build();

        Self {
            cache,
            ttl,
            expired,
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.session_ttl_seconds))
    }

    /// Lifetime applied to new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached record for `id` unless it is absent or expired.
    pub async fn get(&self, id: &Uuid) -> Option<User> {
        self.cache.get(id).await
    }

    /// Insert or replace the record for `id`, expiring `ttl` from now.
    pub async fn put(&self, id: Uuid, user: User) {
        self.cache.insert(id, user).await;
    }

    /// Drop the entry for `id`, if any.
    pub async fn invalidate(&self, id: &Uuid) {
        self.cache.invalidate(id).await;
    }

    /// Physically remove every expired entry.
    ///
    /// Returns how many entries expired since the previous sweep, including
    /// any that background maintenance already dropped.
    pub async fn sweep(&self) -> usize {
        self.cache.run_pending_tasks().await;
        let removed = self.expired.swap(0, Ordering::AcqRel);
        debug!(
            removed,
            remaining = self.cache.entry_count(),
            "Session cache swept"
        );
        removed
    }

    /// Number of resident entries once pending maintenance has run.
    pub async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }

    /// Whether no entries are resident.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::time::sleep;

    // The cache runs on the wall clock, so expiry tests use short real TTLs.
    const TTL: Duration = Duration::from_millis(400);

    fn user(username: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            first_name: "Cache".to_string(),
            last_name: "Test".to_string(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_within_ttl_returns_record() {
        let cache = SessionCache::new(Duration::from_secs(30 * 60));
        let alice = user("alice");
        cache.put(alice.id, alice.clone()).await;

        assert_eq!(cache.get(&alice.id).await, Some(alice));
        assert_eq!(cache.ttl(), Duration::from_secs(30 * 60));
    }

    #[tokio::test]
    async fn test_get_after_ttl_misses_without_sweep() {
        let cache = SessionCache::new(TTL);
        let alice = user("alice");
        cache.put(alice.id, alice.clone()).await;

        sleep(TTL + Duration::from_millis(100)).await;
        assert!(cache.get(&alice.id).await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_and_extends_expiry() {
        let cache = SessionCache::new(TTL);
        let mut alice = user("alice");
        cache.put(alice.id, alice.clone()).await;

        sleep(Duration::from_millis(250)).await;
        alice.first_name = "Alicia".to_string();
        cache.put(alice.id, alice.clone()).await;

        sleep(Duration::from_millis(250)).await;
        let cached = cache.get(&alice.id).await.unwrap();
        assert_eq!(cached.first_name, "Alicia");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_entries() {
        let cache = SessionCache::new(TTL);
        let old = user("old");
        let fresh = user("fresh");

        cache.put(old.id, old.clone()).await;
        sleep(Duration::from_millis(300)).await;
        cache.put(fresh.id, fresh.clone()).await;
        sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.sweep().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&old.id).await.is_none());
        assert_eq!(cache.get(&fresh.id).await, Some(fresh));

        // Idempotent.
        assert_eq!(cache.sweep().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_identity_misses() {
        let cache = SessionCache::new(TTL);
        assert!(cache.get(&Uuid::new_v4()).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_is_not_counted_as_expiry() {
        let cache = SessionCache::new(TTL);
        let alice = user("alice");
        cache.put(alice.id, alice.clone()).await;
        cache.invalidate(&alice.id).await;

        assert!(cache.get(&alice.id).await.is_none());
        assert_eq!(cache.sweep().await, 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_get_sweep() {
        let cache = Arc::new(SessionCache::new(Duration::from_secs(30 * 60)));
        let users: Vec<User> = (0..32).map(|i| user(&format!("u{i}"))).collect();

        let mut tasks = Vec::new();
        for u in users.clone() {
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move {
                cache.put(u.id, u.clone()).await;
                cache.sweep().await;
                cache.get(&u.id).await
            }));
        }

        for (task, u) in tasks.into_iter().zip(users) {
            assert_eq!(task.await.unwrap(), Some(u));
        }
        assert_eq!(cache.len().await, 32);
    }
}
