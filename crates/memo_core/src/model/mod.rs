//! Memo domain model.
//!
//! # Responsibility
//! - Define memo identity (`MemoId`) and the opaque block document shape.
//! - Hold active session state for the single editable memo.
//!
//! # Invariants
//! - Every memo is identified by a namespaced, non-empty `MemoId`.
//! - Block content is owned by the editor; core never inspects its schema.

pub mod document;
pub mod memo;
pub mod session;
