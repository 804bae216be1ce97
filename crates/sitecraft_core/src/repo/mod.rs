//! Persistence adapter: durable slots holding serialized collections.
//!
//! # Responsibility
//! - Store one JSON collection per entity kind under a fixed key.
//! - Hide the SQLite details from the entity store.
//!
//! # Invariants
//! - Loading never fails: absent or malformed slots read as empty.
//! - Saving overwrites the whole slot.

pub mod slot_repo;
