//! Slot store contracts plus SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Read and write raw slot payloads (`SlotStore`).
//! - Convert collections to and from JSON text (`load_collection`,
//!   `save_collection`).
//!
//! # Invariants
//! - `save_collection` then `load_collection` returns an equal collection in
//!   the same order.
//! - `load_collection` returns an empty collection for an absent slot, an
//!   unreadable slot, or a payload that does not parse.

use crate::db::DbError;
use crate::model::EntityKind;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Error raised by raw slot access or payload encoding.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode slot payload: {err}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw durable key/value slots.
pub trait SlotStore {
    /// Returns the stored payload, or `None` when the slot was never written.
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;

    /// Replaces the payload stored under `key`.
    fn write_slot(&self, key: &str, payload: &str) -> SlotResult<()>;
}

impl<T: SlotStore + ?Sized> SlotStore for &T {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, payload: &str) -> SlotResult<()> {
        (**self).write_slot(key, payload)
    }
}

/// SQLite-backed slots over the `slots` table.
pub struct SqliteSlotStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore<'_> {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, key: &str, payload: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }
}

/// Process-local slots for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw payload of `key`, if any.
    pub fn payload(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.payload(key))
    }

    fn write_slot(&self, key: &str, payload: &str) -> SlotResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Loads the collection stored for `kind`.
///
/// Storage faults and parse failures are logged and read as empty so a
/// damaged slot never blocks the operator.
pub fn load_collection<T, S>(store: &S, kind: EntityKind) -> Vec<T>
where
    T: DeserializeOwned,
    S: SlotStore + ?Sized,
{
    let key = kind.slot_key();
    let payload = match store.read_slot(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("event=slot_load module=repo status=empty kind={kind}");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=error kind={kind} error_code=slot_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<T>>(&payload) {
        Ok(records) => {
            debug!(
                "event=slot_load module=repo status=ok kind={kind} count={}",
                records.len()
            );
            records
        }
        Err(err) => {
            warn!(
                "event=slot_load module=repo status=error kind={kind} error_code=slot_parse_failed bytes={} error={err}",
                payload.len()
            );
            Vec::new()
        }
    }
}

/// Serializes `records` and overwrites the slot for `kind`.
pub fn save_collection<T, S>(store: &S, kind: EntityKind, records: &[T]) -> SlotResult<()>
where
    T: Serialize,
    S: SlotStore + ?Sized,
{
    let payload = serde_json::to_string(records).map_err(SlotError::Encode)?;
    store.write_slot(kind.slot_key(), &payload)?;
    debug!(
        "event=slot_save module=repo status=ok kind={kind} count={} bytes={}",
        records.len(),
        payload.len()
    );
    Ok(())
}
