//! Worker record with attendance state.
//!
//! # Invariants
//! - `is_present == true` iff `check_in_time.is_some() && check_out_time.is_none()`.
//! - Attendance fields change only through `derive::attendance::attendance_toggle`.
//! - Timestamps win over a contradicting `is_present` flag on refresh.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use crate::derive::attendance::present_from_times;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub hourly_rate: f64,
    pub project_id: Option<EntityId>,
    pub is_present: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

/// Worker registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerDraft {
    pub name: String,
    pub phone: String,
    pub role: String,
    pub hourly_rate: Option<f64>,
    pub project_id: Option<EntityId>,
}

/// Worker edit form. Attendance is not editable here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub hourly_rate: Option<f64>,
    pub project_id: Option<EntityId>,
}

impl Entity for Worker {
    const KIND: EntityKind = EntityKind::Worker;
    type Draft = WorkerDraft;
    type Patch = WorkerPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: WorkerDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &draft.name)
            .text("phone", &draft.phone)
            .text("role", &draft.role)
            .present("hourlyRate", &draft.hourly_rate)
            .present("projectId", &draft.project_id);
        if let Some(hourly_rate) = draft.hourly_rate {
            check.amount("hourlyRate", hourly_rate);
        }
        check.finish()?;

        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            role: draft.role.trim().to_string(),
            hourly_rate: draft.hourly_rate.unwrap_or_default(),
            project_id: draft.project_id,
            is_present: false,
            check_in_time: None,
            check_out_time: None,
            created_date: now,
        })
    }

    fn apply_patch(&mut self, patch: WorkerPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(role) = patch.role {
            self.role = role.trim().to_string();
        }
        if let Some(hourly_rate) = patch.hourly_rate {
            self.hourly_rate = hourly_rate;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &self.name)
            .text("phone", &self.phone)
            .text("role", &self.role)
            .amount("hourlyRate", self.hourly_rate);
        check.finish()
    }

    fn refresh_derived(&mut self) {
        self.is_present = present_from_times(self);
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
        &collections.workers
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.workers
    }
}

#[cfg(test)]
mod tests {
    use super::{Worker, WorkerDraft};
    use crate::model::{Entity, EntityKind};
    use chrono::Utc;

    fn draft() -> WorkerDraft {
        WorkerDraft {
            name: "A. Smith".to_string(),
            phone: "555-0100".to_string(),
            role: "Mason".to_string(),
            hourly_rate: Some(25.0),
            project_id: Some(10),
        }
    }

    #[test]
    fn new_worker_starts_absent_without_times() {
        let worker = Worker::from_draft(1, draft(), Utc::now()).unwrap();
        assert!(!worker.is_present);
        assert!(worker.check_in_time.is_none());
        assert!(worker.check_out_time.is_none());
    }

    #[test]
    fn project_is_required() {
        let mut draft = draft();
        draft.project_id = None;
        let err = Worker::from_draft(1, draft, Utc::now()).unwrap_err();
        assert_eq!(err.missing, vec!["projectId"]);
    }

    #[test]
    fn refresh_trusts_timestamps_over_flag() {
        let mut worker = Worker::from_draft(1, draft(), Utc::now()).unwrap();
        worker.is_present = true;
        worker.refresh_derived();
        assert!(!worker.is_present);

        worker.check_in_time = Some(Utc::now());
        worker.refresh_derived();
        assert!(worker.is_present);
    }

    #[test]
    fn detach_only_clears_matching_project() {
        let mut worker = Worker::from_draft(1, draft(), Utc::now()).unwrap();
        assert!(!worker.detach(EntityKind::Project, 11));
        assert!(!worker.detach(EntityKind::Manager, 10));
        assert!(worker.detach(EntityKind::Project, 10));
        assert_eq!(worker.project_id, None);
    }
}
