//! Flutter-facing bridge over `memo_core`.

pub mod api;
