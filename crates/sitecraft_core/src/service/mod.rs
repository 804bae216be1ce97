//! Core use-case services.
//!
//! # Responsibility
//! - Own the authoritative in-memory collections (`EntityStore`).
//! - Keep presentation callers decoupled from slot storage details.

pub mod entity_store;
pub mod ids;
pub mod search;
