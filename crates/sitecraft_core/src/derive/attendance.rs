//! Two-state worker attendance machine.
//!
//! # Invariants
//! - `Absent -> Present` stamps `check_in_time` and clears `check_out_time`.
//! - `Present -> Absent` stamps `check_out_time` and keeps `check_in_time`.
//! - Transitions happen only on an explicit toggle, never on a timer.

use crate::model::worker::Worker;
use chrono::{DateTime, Utc};

/// Current attendance state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    Absent,
    Present,
}

pub fn attendance_state(worker: &Worker) -> AttendanceState {
    if worker.is_present {
        AttendanceState::Present
    } else {
        AttendanceState::Absent
    }
}

/// Returns `worker` with its attendance flipped at `now`.
pub fn attendance_toggle(worker: &Worker, now: DateTime<Utc>) -> Worker {
    let mut next = worker.clone();
    match attendance_state(worker) {
        AttendanceState::Absent => {
            next.is_present = true;
            next.check_in_time = Some(now);
            next.check_out_time = None;
        }
        AttendanceState::Present => {
            next.is_present = false;
            next.check_out_time = Some(now);
        }
    }
    next
}

/// Presence implied by the attendance timestamps.
pub fn present_from_times(worker: &Worker) -> bool {
    worker.check_in_time.is_some() && worker.check_out_time.is_none()
}

/// Returns whether presence flags and timestamps agree.
pub fn attendance_consistent(worker: &Worker) -> bool {
    worker.is_present == present_from_times(worker)
}
