//! Memo storage adapter over a key-value store.
//!
//! # Responsibility
//! - Serialize memo documents to JSON text under their `MemoId` key.
//! - Enumerate stored memos by namespace prefix.
//!
//! # Invariants
//! - `load(save(id, d)) == d` for every document.
//! - `delete` is idempotent.
//! - Persisted values that are not block arrays are reported, not masked.

use crate::model::document::MemoDocument;
use crate::model::memo::MemoId;
use crate::repo::kv_store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, warn};
use serde_json::Value;

/// Document persistence keyed by memo identifier.
pub struct MemoStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> MemoStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists `document` under `id`, replacing any prior value.
    pub fn save(&mut self, id: &MemoId, document: &MemoDocument) -> StoreResult<()> {
        let payload = serde_json::to_string(document)?;
        self.store.set(id.as_key(), &payload)?;
        debug!(
            "event=memo_save module=storage status=ok blocks={} bytes={}",
            document.len(),
            payload.len()
        );
        Ok(())
    }

    /// Returns the persisted document, or `None` when nothing is stored.
    pub fn load(&self, id: &MemoId) -> StoreResult<Option<MemoDocument>> {
        let Some(payload) = self.store.get(id.as_key())? else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&payload)? {
            Value::Array(blocks) => Ok(Some(MemoDocument::from_blocks(blocks))),
            other => {
                let found = value_kind(&other);
                warn!(
                    "event=memo_load module=storage status=error error_code=not_a_block_array kind={} title_len={}",
                    found,
                    id.title().chars().count()
                );
                Err(StoreError::InvalidData(format!(
                    "expected a block array, found {found}"
                )))
            }
        }
    }

    /// Removes the document for `id`; absent entries are not an error.
    pub fn delete(&mut self, id: &MemoId) -> StoreResult<()> {
        self.store.remove(id.as_key())
    }

    /// Lists stored memo identifiers, skipping unrelated keys.
    pub fn ids(&self) -> StoreResult<Vec<MemoId>> {
        Ok(self
            .store
            .keys()?
            .iter()
            .filter_map(|key| MemoId::from_key(key))
            .collect())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
