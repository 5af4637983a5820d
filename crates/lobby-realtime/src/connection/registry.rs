//! Connection registry: identity → set of live connections.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use uuid::Uuid;

use super::handle::ConnectionHandle;

/// Thread-safe map from identity to the connections open for it.
///
/// Entries are weak: the registry tracks connections but never keeps one
/// alive. Every read returns a point-in-time snapshot taken after the shard
/// lock is released, so callers may send, close, or re-enter the registry
/// while iterating.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → connections for that user (one user can have several devices).
    sets: DashMap<Uuid, Vec<Weak<ConnectionHandle>>>,
}

fn is_same(weak: &Weak<ConnectionHandle>, handle: &ConnectionHandle) -> bool {
    std::ptr::eq(weak.as_ptr(), handle)
}

fn live(set: &[Weak<ConnectionHandle>]) -> impl Iterator<Item = Arc<ConnectionHandle>> + '_ {
    set.iter()
        .filter_map(Weak::upgrade)
        .filter(|handle| !handle.is_closed())
}

impl ConnectionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handle` to `identity`'s set.
    ///
    /// Returns `false` if this exact handle was already present. Dropped
    /// entries found along the way are pruned.
    pub fn register(&self, identity: Uuid, handle: &Arc<ConnectionHandle>) -> bool {
        let mut set = self.sets.entry(identity).or_default();
        set.retain(|weak| weak.strong_count() > 0);
        if set.iter().any(|weak| is_same(weak, handle)) {
            return false;
        }
        set.push(Arc::downgrade(handle));
        true
    }

    /// Remove `handle` from `identity`'s set, matching the handle instance.
    ///
    /// Returns whether it was present. The identity's entry is dropped once
    /// its set is empty.
    pub fn unregister(&self, identity: Uuid, handle: &ConnectionHandle) -> bool {
        let removed = match self.sets.get_mut(&identity) {
            Some(mut set) => {
                let present = set.iter().any(|weak| is_same(weak, handle));
                set.retain(|weak| !is_same(weak, handle) && weak.strong_count() > 0);
                present
            }
            None => false,
        };
        self.sets.remove_if(&identity, |_, set| set.is_empty());
        removed
    }

    /// Live connections for one identity.
    pub fn snapshot(&self, identity: &Uuid) -> Vec<Arc<ConnectionHandle>> {
        self.sets
            .get(identity)
            .map(|set| live(set.value()).collect())
            .unwrap_or_default()
    }

    /// Live connections across every identity.
    pub fn snapshot_all(&self) -> Vec<Arc<ConnectionHandle>> {
        let mut all = Vec::new();
        for entry in self.sets.iter() {
            all.extend(live(entry.value()));
        }
        all
    }

    /// Apply `f` to a snapshot of `identity`'s connections.
    pub fn for_each<F>(&self, identity: &Uuid, mut f: F)
    where
        F: FnMut(&Arc<ConnectionHandle>),
    {
        for handle in &self.snapshot(identity) {
            f(handle);
        }
    }

    /// Apply `f` to a snapshot of every connection.
    pub fn for_each_all<F>(&self, mut f: F)
    where
        F: FnMut(&Arc<ConnectionHandle>),
    {
        for handle in &self.snapshot_all() {
            f(handle);
        }
    }

    /// Returns total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.sets.iter().map(|entry| live(entry.value()).count()).sum()
    }

    /// Returns number of identities with at least one live connection.
    pub fn user_count(&self) -> usize {
        self.sets
            .iter()
            .filter(|entry| live(entry.value()).next().is_some())
            .count()
    }

    /// Checks if a user currently has a live connection.
    pub fn is_user_connected(&self, identity: &Uuid) -> bool {
        self.sets
            .get(identity)
            .is_some_and(|set| live(set.value()).next().is_some())
    }
}
