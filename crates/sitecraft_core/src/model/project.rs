//! Project record.
//!
//! # Invariants
//! - `progress` is within `0..=100`.
//! - `end_date` is not earlier than `start_date`.
//! - `progress` and `status` are set by the operator, never derived.
//! - `worker_count` mirrors the workers assigned to this project.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Operator-reported schedule health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "On Track")]
    OnTrack,
    Ahead,
    Delayed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u8,
    pub status: ProjectStatus,
    #[serde(default)]
    pub manager_id: Option<EntityId>,
    #[serde(default)]
    pub worker_count: u32,
    pub created_date: DateTime<Utc>,
}

/// Project creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub location: String,
    pub description: String,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub manager_id: Option<EntityId>,
}

/// Project edit form.
///
/// `manager_id: Some(None)` unassigns the manager.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: Option<u8>,
    pub status: Option<ProjectStatus>,
    pub manager_id: Option<Option<EntityId>>,
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: ProjectDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &draft.name)
            .text("location", &draft.location)
            .present("budget", &draft.budget)
            .present("startDate", &draft.start_date)
            .present("endDate", &draft.end_date);
        if let Some(budget) = draft.budget {
            check.amount("budget", budget);
        }
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            check_schedule(&mut check, start, end);
        }
        check.finish()?;

        let (Some(budget), Some(start_date), Some(end_date)) =
            (draft.budget, draft.start_date, draft.end_date)
        else {
            return Err(ValidationError::default());
        };

        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            location: draft.location.trim().to_string(),
            description: draft.description.trim().to_string(),
            budget,
            start_date,
            end_date,
            progress: 0,
            status: ProjectStatus::OnTrack,
            manager_id: draft.manager_id,
            worker_count: 0,
            created_date: now,
        })
    }

    fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(location) = patch.location {
            self.location = location.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(manager_id) = patch.manager_id {
            self.manager_id = manager_id;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &self.name)
            .text("location", &self.location)
            .amount("budget", self.budget)
            .percent("progress", self.progress);
        check_schedule(&mut check, self.start_date, self.end_date);
        check.finish()
    }

    fn manager_ref(&self) -> Option<EntityId> {
        self.manager_id
    }

    fn detach(&mut self, kind: EntityKind, id: EntityId) -> bool {
        if kind == EntityKind::Manager && self.manager_id == Some(id) {
            self.manager_id = None;
            return true;
        }
        false
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.projects
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.projects
    }
}

fn check_schedule(check: &mut FieldCheck, start: NaiveDate, end: NaiveDate) {
    if end < start {
        check.reject(
            "endDate",
            format!("must not be before start date {start}, got {end}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectDraft, ProjectPatch, ProjectStatus};
    use crate::model::Entity;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn draft() -> ProjectDraft {
        ProjectDraft {
            name: "Harbor Tower".to_string(),
            location: "Pier 4".to_string(),
            budget: Some(250_000.0),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2027, 1, 31),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn from_draft_applies_defaults() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let project = Project::from_draft(7, draft(), now).unwrap();
        assert_eq!(project.progress, 0);
        assert_eq!(project.status, ProjectStatus::OnTrack);
        assert_eq!(project.worker_count, 0);
        assert_eq!(project.created_date, now);
    }

    #[test]
    fn from_draft_reports_every_missing_field() {
        let err = Project::from_draft(1, ProjectDraft::default(), Utc::now()).unwrap_err();
        assert_eq!(
            err.missing,
            vec!["name", "location", "budget", "startDate", "endDate"]
        );
    }

    #[test]
    fn reversed_schedule_is_invalid() {
        let mut draft = draft();
        draft.end_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        let err = Project::from_draft(1, draft, Utc::now()).unwrap_err();
        assert!(err.is_invalid("endDate"));
    }

    #[test]
    fn patch_can_unassign_manager() {
        let mut source = draft();
        source.manager_id = Some(3);
        let mut project = Project::from_draft(1, source, Utc::now()).unwrap();
        project.apply_patch(ProjectPatch {
            manager_id: Some(None),
            ..ProjectPatch::default()
        });
        assert_eq!(project.manager_id, None);
    }

    #[test]
    fn status_serializes_with_display_labels() {
        let json = serde_json::to_value(ProjectStatus::OnTrack).unwrap();
        assert_eq!(json, "On Track");
    }
}
