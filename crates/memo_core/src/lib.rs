//! Core domain logic for the memo app.
//! This crate is the single source of truth for memo lifecycle invariants.

pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use editor::{BlockEditor, BlockEditorFactory, EditorBinding, EditorFactory, EditorSurface};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{paragraph_block, MemoDocument};
pub use model::memo::{MemoId, MemoValidationError, MEMO_KEY_PREFIX};
pub use model::session::{LoadTicket, SessionPhase, SessionState};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use repo::memo_store::MemoStorage;
pub use service::memo_service::{LoadOutcome, MemoError, MemoResult, MemoService, SelectOutcome};
pub use service::registry::MemoRegistry;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
