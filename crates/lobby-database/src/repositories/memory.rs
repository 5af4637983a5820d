//! In-process identity store for single-node runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use lobby_core::result::AppResult;
use lobby_entity::User;

use crate::store::IdentityStore;

/// Identity store backed by a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Remove a user record, returning it if present.
    pub fn remove(&self, id: &Uuid) -> Option<User> {
        self.users.remove(id).map(|(_, user)| user)
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryUserStore {
    async fn find_identity(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
