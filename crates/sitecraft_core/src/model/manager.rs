//! Project manager record.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManager {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub specialization: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub specialization: Option<String>,
}

impl Entity for ProjectManager {
    const KIND: EntityKind = EntityKind::Manager;
    type Draft = ManagerDraft;
    type Patch = ManagerPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: ManagerDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let manager = Self {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            experience: draft.experience.trim().to_string(),
            specialization: draft.specialization.trim().to_string(),
            created_date: now,
        };
        manager.validate()?;
        Ok(manager)
    }

    fn apply_patch(&mut self, patch: ManagerPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone.trim().to_string();
        }
        if let Some(experience) = patch.experience {
            self.experience = experience.trim().to_string();
        }
        if let Some(specialization) = patch.specialization {
            self.specialization = specialization.trim().to_string();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &self.name)
            .text("email", &self.email)
            .text("phone", &self.phone);
        if !self.email.is_empty() && !EMAIL_RE.is_match(&self.email) {
            check.reject("email", format!("`{}` is not an email address", self.email));
        }
        check.finish()
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.managers
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.managers
    }
}
