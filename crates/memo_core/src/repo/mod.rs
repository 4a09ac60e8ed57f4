//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value store contract memos are persisted through.
//! - Isolate SQLite and serialization details from lifecycle orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`) in addition to DB
//!   transport errors.

pub mod kv_store;
pub mod memo_store;
