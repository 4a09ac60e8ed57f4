//! In-memory registry of known memo identifiers.

use crate::model::memo::MemoId;
use crate::repo::kv_store::{KeyValueStore, StoreResult};
use crate::repo::memo_store::MemoStorage;
use log::info;

/// Known memo identifiers in insertion order.
///
/// Only `reconcile` reads storage; every other change flows through
/// `add`/`remove`, so out-of-band storage edits stay invisible until the
/// next reconcile.
#[derive(Debug, Clone, Default)]
pub struct MemoRegistry {
    ids: Vec<MemoId>,
}

impl MemoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from the memo keys currently in storage.
    pub fn from_storage<S: KeyValueStore>(storage: &MemoStorage<S>) -> StoreResult<Self> {
        let mut registry = Self::new();
        registry.reconcile(storage)?;
        Ok(registry)
    }

    /// Replaces registry contents with the stored memo keys.
    ///
    /// Returns the number of identifiers after resync.
    pub fn reconcile<S: KeyValueStore>(&mut self, storage: &MemoStorage<S>) -> StoreResult<usize> {
        let stored = storage.ids()?;
        let before = self.ids.len();
        self.ids = stored;
        info!(
            "event=registry_reconcile module=registry status=ok before={} after={}",
            before,
            self.ids.len()
        );
        Ok(self.ids.len())
    }

    pub fn list(&self) -> &[MemoId] {
        &self.ids
    }

    pub fn contains(&self, id: &MemoId) -> bool {
        self.ids.contains(id)
    }

    /// Inserts `id` when absent. Returns whether it was inserted.
    pub fn add(&mut self, id: MemoId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes `id` when present. Returns whether it was removed.
    pub fn remove(&mut self, id: &MemoId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|known| known != id);
        self.ids.len() != before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoRegistry;
    use crate::model::document::MemoDocument;
    use crate::model::memo::MemoId;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};
    use crate::repo::memo_store::MemoStorage;

    fn id(title: &str) -> MemoId {
        MemoId::from_title(title).unwrap()
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut registry = MemoRegistry::new();
        assert!(registry.add(id("a")));
        assert!(!registry.add(id("a")));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&id("a")));
        assert!(!registry.remove(&id("a")));
        assert!(registry.is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut registry = MemoRegistry::new();
        registry.add(id("b"));
        registry.add(id("a"));
        assert_eq!(registry.list(), &[id("b"), id("a")]);
    }

    #[test]
    fn reconcile_picks_up_memo_keys_only() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set("theme", "dark").unwrap();
        let mut storage = MemoStorage::new(kv);
        storage.save(&id("A"), &MemoDocument::default_content()).unwrap();

        let mut registry = MemoRegistry::from_storage(&storage).unwrap();
        assert_eq!(registry.list(), &[id("A")]);

        storage.save(&id("B"), &MemoDocument::default_content()).unwrap();
        assert!(!registry.contains(&id("B")));

        assert_eq!(registry.reconcile(&storage).unwrap(), 2);
        assert!(registry.contains(&id("B")));
    }
}
