// ── Generic reactive entity collection ──
//
// Lock-free concurrent storage with O(1) keyed lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A reactive collection for a single entity type.
///
/// `DashMap` provides concurrent keyed access; every mutation bumps a
/// version counter and rebuilds the snapshot that subscribers receive.
/// Snapshots are `Arc<Vec<Arc<T>>>` so reads are wait-free clones.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    /// Primary storage: key string -> entity. Keys are entity ids for
    /// nodes/hosts and synthetic composite keys (`"{client}@{network}"`,
    /// `"{name}.{network}"`) for network-scoped entities.
    by_key: DashMap<String, Arc<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_key: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let is_new = self.by_key.insert(key, Arc::new(entity)).is_none();
        self.rebuild_snapshot();
        self.bump_version();
        is_new
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.by_key.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.by_key.get(key).map(|r| Arc::clone(r.value()))
    }

    /// The current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    /// All current keys.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.by_key.iter().map(|r| r.key().clone()).collect()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<T>> = self.by_key.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_reports_novelty() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.upsert("k".into(), "v1".into()));
        assert!(!col.upsert("k".into(), "v2".into()));
        assert_eq!(*col.get("k").unwrap(), "v2");
    }

    #[test]
    fn remove_is_observable_in_snapshot() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.upsert("a".into(), "x".into());
        col.upsert("b".into(), "y".into());
        assert_eq!(col.snapshot().len(), 2);

        assert_eq!(*col.remove("a").unwrap(), "x");
        assert!(col.remove("a").is_none());
        assert_eq!(col.snapshot().len(), 1);
    }

    #[test]
    fn subscribers_see_mutations() {
        let col: EntityCollection<String> = EntityCollection::new();
        let rx = col.subscribe();
        col.upsert("a".into(), "x".into());
        assert_eq!(rx.borrow().len(), 1);
    }
}
