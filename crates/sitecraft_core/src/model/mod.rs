//! Domain model for the construction site tracker.
//!
//! # Responsibility
//! - Define the six record types held by the entity store.
//! - Define form drafts and update patches with required-field validation.
//! - Describe each record's storage kind and its outgoing references.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId`.
//! - Cross-record links are identifiers, never names.
//! - Stored derived fields are refreshed through `Entity::refresh_derived`.
//!
//! # See also
//! - DESIGN.md (data model section)

pub mod document;
pub mod entity;
pub mod manager;
pub mod material;
pub mod project;
pub mod task;
pub mod validation;
pub mod worker;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub use entity::{Collections, Entity};

/// Stable identifier shared by every record kind.
///
/// Values are epoch milliseconds at creation time, bumped so that one store
/// never issues the same value twice.
pub type EntityId = i64;

/// One of the six record kinds, each persisted in its own durable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Material,
    Worker,
    Task,
    Manager,
    Document,
}

impl EntityKind {
    /// All kinds in slot load order.
    pub const ALL: [EntityKind; 6] = [
        Self::Project,
        Self::Material,
        Self::Worker,
        Self::Task,
        Self::Manager,
        Self::Document,
    ];

    /// Durable slot key for this kind's collection.
    pub fn slot_key(self) -> &'static str {
        match self {
            Self::Project => "sitecraft-projects",
            Self::Material => "sitecraft-materials",
            Self::Worker => "sitecraft-workers",
            Self::Task => "sitecraft-tasks",
            Self::Manager => "sitecraft-managers",
            Self::Document => "sitecraft-documents",
        }
    }

    /// Lowercase name used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Material => "material",
            Self::Worker => "worker",
            Self::Task => "task",
            Self::Manager => "manager",
            Self::Document => "document",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
