//! Derivation engine.
//!
//! # Responsibility
//! - Compute status fields, state-machine transitions and aggregates.
//! - Stay free of I/O so views can recompute on every read.
//!
//! # Invariants
//! - Every function is pure and total over its inputs.
//! - Aggregates over empty collections return zero values, never NaN.

pub mod attendance;
pub mod files;
pub mod stats;
pub mod stock;
pub mod task_flow;
