//! Task status transitions and due-date checks.
//!
//! # Invariants
//! - `Pending -> InProgress` moves progress to 25 only from 0.
//! - Any transition to `Completed` sets progress to 100.
//! - Other transitions keep progress.
//! - Due dates never change status on their own.

use crate::model::task::{Task, TaskStatus};
use chrono::NaiveDate;

/// Progress recorded when a task is first started.
pub const STARTED_PROGRESS: u8 = 25;
pub const COMPLETED_PROGRESS: u8 = 100;

/// Returns `task` moved to `new_status` with progress adjusted.
pub fn task_status_transition(task: &Task, new_status: TaskStatus) -> Task {
    let mut next = task.clone();
    apply_status_transition(&mut next, new_status);
    next
}

/// In-place form of `task_status_transition`.
pub fn apply_status_transition(task: &mut Task, new_status: TaskStatus) {
    match (task.status, new_status) {
        (_, TaskStatus::Completed) => task.progress = COMPLETED_PROGRESS,
        (TaskStatus::Pending, TaskStatus::InProgress) if task.progress == 0 => {
            task.progress = STARTED_PROGRESS;
        }
        _ => {}
    }
    task.status = new_status;
}

/// Whether `task` is past its due date on `today` and still open.
///
/// Informational only; callers decide whether to mark it `Overdue`.
pub fn is_past_due(task: &Task, today: NaiveDate) -> bool {
    task.status != TaskStatus::Completed && task.due_date < today
}

#[cfg(test)]
mod tests {
    use super::{is_past_due, task_status_transition};
    use crate::model::task::{Task, TaskPriority, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(status: TaskStatus, progress: u8) -> Task {
        Task {
            id: 1,
            title: "Frame level 2".to_string(),
            description: String::new(),
            project_id: Some(3),
            assignee: "Crew A".to_string(),
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            status,
            progress,
            created_date: Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn starting_a_fresh_task_sets_quarter_progress() {
        let started = task_status_transition(&task(TaskStatus::Pending, 0), TaskStatus::InProgress);
        assert_eq!(started.status, TaskStatus::InProgress);
        assert_eq!(started.progress, 25);
    }

    #[test]
    fn starting_keeps_existing_progress() {
        let started = task_status_transition(&task(TaskStatus::Pending, 40), TaskStatus::InProgress);
        assert_eq!(started.progress, 40);
    }

    #[test]
    fn completion_always_reaches_full_progress() {
        for (status, progress) in [
            (TaskStatus::Pending, 0),
            (TaskStatus::InProgress, 60),
            (TaskStatus::Overdue, 10),
            (TaskStatus::Completed, 100),
        ] {
            let done = task_status_transition(&task(status, progress), TaskStatus::Completed);
            assert_eq!(done.progress, 100);
        }
    }

    #[test]
    fn other_transitions_keep_progress() {
        let overdue = task_status_transition(&task(TaskStatus::InProgress, 60), TaskStatus::Overdue);
        assert_eq!(overdue.progress, 60);
        let resumed = task_status_transition(&task(TaskStatus::Overdue, 0), TaskStatus::InProgress);
        assert_eq!(resumed.progress, 0);
        let reopened = task_status_transition(&task(TaskStatus::Completed, 100), TaskStatus::Pending);
        assert_eq!(reopened.progress, 100);
    }

    #[test]
    fn past_due_ignores_completed_tasks() {
        let after = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert!(is_past_due(&task(TaskStatus::InProgress, 30), after));
        assert!(!is_past_due(&task(TaskStatus::Completed, 100), after));
        let on_due_date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert!(!is_past_due(&task(TaskStatus::Pending, 0), on_due_date));
    }
}
