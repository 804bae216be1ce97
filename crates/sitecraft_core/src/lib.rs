//! Core domain logic for the SiteCraft construction dashboard.
//! This crate is the single source of truth for record invariants,
//! derived figures and durable storage.

pub mod config;
pub mod db;
pub mod derive;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use derive::stats::{dashboard_stats, DashboardStats};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::validation::ValidationError;
pub use model::{Collections, Entity, EntityId, EntityKind};
pub use repo::slot_repo::{MemorySlotStore, SlotError, SlotResult, SlotStore, SqliteSlotStore};
pub use report::{
    attendance_report, generate_report, AttendanceReport, ExportFile, ReportDocument, ReportError,
    ReportKind,
};
pub use service::entity_store::{
    ChangeAction, ChangeEvent, EntityStore, StoreError, StoreResult, SubscriptionId,
};
pub use service::search::{ListQuery, Searchable};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
