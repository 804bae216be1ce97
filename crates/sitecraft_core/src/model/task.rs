//! Task record.
//!
//! # Invariants
//! - `progress` is within `0..=100`.
//! - Status changes go through `derive::task_flow::task_status_transition`.
//! - `Completed` always carries `progress == 100`, even after a progress-only
//!   edit or a hand-edited payload.
//! - `Overdue` is only ever set explicitly.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use crate::derive::task_flow::{apply_status_transition, COMPLETED_PROGRESS};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project_id: Option<EntityId>,
    pub assignee: String,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub progress: u8,
    pub created_date: DateTime<Utc>,
}

/// Task creation form. `priority` falls back to `Medium`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub project_id: Option<EntityId>,
    pub assignee: String,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

/// Task edit form.
///
/// `progress` is applied before `status`, so a transition to `Completed`
/// wins over an explicit progress value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<EntityId>,
    pub assignee: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub progress: Option<u8>,
    pub status: Option<TaskStatus>,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("title", &draft.title)
            .present("projectId", &draft.project_id)
            .text("assignee", &draft.assignee)
            .present("dueDate", &draft.due_date);
        check.finish()?;

        let Some(due_date) = draft.due_date else {
            return Err(ValidationError::default());
        };

        Ok(Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            project_id: draft.project_id,
            assignee: draft.assignee.trim().to_string(),
            priority: draft.priority.unwrap_or_default(),
            due_date,
            status: TaskStatus::Pending,
            progress: 0,
            created_date: now,
        })
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(status) = patch.status {
            apply_status_transition(self, status);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("title", &self.title)
            .text("assignee", &self.assignee)
            .percent("progress", self.progress);
        check.finish()
    }

    fn refresh_derived(&mut self) {
        if self.status == TaskStatus::Completed {
            self.progress = COMPLETED_PROGRESS;
        }
    }

    fn project_ref(&self) -> Option<EntityId> {
        self.project_id
    }

    fn detach(&mut self, kind: EntityKind, id: EntityId) -> bool {
        if kind == EntityKind::Project && self.project_id == Some(id) {
            self.project_id = None;
            return true;
        }
        false
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.tasks
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.tasks
    }
}
