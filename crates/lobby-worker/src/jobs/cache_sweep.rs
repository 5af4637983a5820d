//! Physical removal of expired session cache entries.

use std::sync::Arc;

use tracing::info;

use lobby_cache::SessionCache;

/// Sweeps the session cache.
#[derive(Debug, Clone)]
pub struct CacheSweepJob {
    cache: Arc<SessionCache>,
}

impl CacheSweepJob {
    /// Create a sweep job for `cache`.
    pub fn new(cache: Arc<SessionCache>) -> Self {
        Self { cache }
    }

    /// Run one sweep. Returns the number of entries removed.
    pub async fn run(&self) -> usize {
        let removed = self.cache.sweep().await;
        let remaining = self.cache.len().await;
        info!(removed, remaining, "Session cache sweep completed");
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use lobby_entity::User;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_run_removes_expired_entries() {
        let cache = Arc::new(SessionCache::new(Duration::from_millis(200)));
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            first_name: "Sweep".to_string(),
            last_name: "Job".to_string(),
            email: "sweep@example.com".to_string(),
            username: "sweep".to_string(),
        };
        cache.put(user.id, user).await;

        let job = CacheSweepJob::new(Arc::clone(&cache));
        assert_eq!(job.run().await, 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(job.run().await, 1);
        assert!(cache.is_empty().await);
    }
}
