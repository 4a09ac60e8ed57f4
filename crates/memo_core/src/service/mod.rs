//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage, registry and session into memo lifecycle APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod memo_service;
pub mod registry;
