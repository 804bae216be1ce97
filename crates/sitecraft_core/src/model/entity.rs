//! Common record contract and the in-memory collection set.
//!
//! # Responsibility
//! - Let the entity store run create/update/remove/list generically.
//! - Hold the six collections as one snapshot-able value.
//!
//! # Invariants
//! - `Entity::id` never changes after `from_draft`.
//! - `refresh_derived` is idempotent.

use super::document::Document;
use super::manager::ProjectManager;
use super::material::Material;
use super::project::Project;
use super::task::Task;
use super::validation::ValidationError;
use super::worker::Worker;
use super::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Record type managed by the entity store.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Storage kind of this record type.
    const KIND: EntityKind;

    /// Whether the collection must always hold at least one record.
    const MUST_KEEP_ONE: bool = false;

    /// Creation form values. Required fields are `String` or `Option`.
    type Draft;

    /// Update form values. `None` leaves a field untouched.
    type Patch;

    fn id(&self) -> EntityId;

    /// Builds a new record from a submitted form.
    ///
    /// # Errors
    /// - Returns every missing required field and invalid value at once.
    fn from_draft(
        id: EntityId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError>;

    /// Merges provided patch fields into this record.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Validates a merged record before it replaces the stored one.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Recomputes stored derived fields from their inputs.
    fn refresh_derived(&mut self) {}

    /// Records an edit time on kinds that track one.
    fn touch(&mut self, _now: DateTime<Utc>) {}

    /// Referenced project, if this kind links to one.
    fn project_ref(&self) -> Option<EntityId> {
        None
    }

    /// Referenced project manager, if this kind links to one.
    fn manager_ref(&self) -> Option<EntityId> {
        None
    }

    /// Clears a reference to a removed record. Returns whether anything changed.
    fn detach(&mut self, _kind: EntityKind, _id: EntityId) -> bool {
        false
    }

    fn collection(collections: &Collections) -> &Vec<Self>;

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

/// Full in-memory state of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    pub projects: Vec<Project>,
    pub materials: Vec<Material>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
    pub managers: Vec<ProjectManager>,
    pub documents: Vec<Document>,
}

impl Collections {
    /// Highest identifier across every collection, or `0` when empty.
    pub fn max_id(&self) -> EntityId {
        let ids = self
            .projects
            .iter()
            .map(Entity::id)
            .chain(self.materials.iter().map(Entity::id))
            .chain(self.workers.iter().map(Entity::id))
            .chain(self.tasks.iter().map(Entity::id))
            .chain(self.managers.iter().map(Entity::id))
            .chain(self.documents.iter().map(Entity::id));
        ids.max().unwrap_or(0)
    }

    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Project => self.projects.len(),
            EntityKind::Material => self.materials.len(),
            EntityKind::Worker => self.workers.len(),
            EntityKind::Task => self.tasks.len(),
            EntityKind::Manager => self.managers.len(),
            EntityKind::Document => self.documents.len(),
        }
    }

    pub fn project(&self, id: EntityId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn manager(&self, id: EntityId) -> Option<&ProjectManager> {
        self.managers.iter().find(|manager| manager.id == id)
    }

    /// Display name of a referenced project.
    pub fn project_name(&self, id: Option<EntityId>) -> Option<&str> {
        id.and_then(|id| self.project(id)).map(|p| p.name.as_str())
    }

    /// Display name of a referenced project manager.
    pub fn manager_name(&self, id: Option<EntityId>) -> Option<&str> {
        id.and_then(|id| self.manager(id)).map(|m| m.name.as_str())
    }

    /// Re-derives stored derived fields on every record.
    pub fn refresh_derived(&mut self) {
        self.projects.iter_mut().for_each(Entity::refresh_derived);
        self.materials.iter_mut().for_each(Entity::refresh_derived);
        self.workers.iter_mut().for_each(Entity::refresh_derived);
        self.tasks.iter_mut().for_each(Entity::refresh_derived);
        self.managers.iter_mut().for_each(Entity::refresh_derived);
        self.documents.iter_mut().for_each(Entity::refresh_derived);
        self.recount_workers();
    }

    /// Recomputes `Project::worker_count` from worker assignments.
    ///
    /// Returns the ids of projects whose count changed.
    pub fn recount_workers(&mut self) -> Vec<EntityId> {
        let mut changed = Vec::new();
        for project in &mut self.projects {
            let count = self
                .workers
                .iter()
                .filter(|worker| worker.project_id == Some(project.id))
                .count() as u32;
            if project.worker_count != count {
                project.worker_count = count;
                changed.push(project.id);
            }
        }
        changed
    }

    /// Clears references to a removed record across all collections.
    ///
    /// Returns `(kind, id)` for every record that changed.
    pub fn detach_references(
        &mut self,
        kind: EntityKind,
        id: EntityId,
    ) -> Vec<(EntityKind, EntityId)> {
        let mut changed = Vec::new();
        detach_in(&mut self.projects, kind, id, &mut changed);
        detach_in(&mut self.materials, kind, id, &mut changed);
        detach_in(&mut self.workers, kind, id, &mut changed);
        detach_in(&mut self.tasks, kind, id, &mut changed);
        detach_in(&mut self.managers, kind, id, &mut changed);
        detach_in(&mut self.documents, kind, id, &mut changed);
        changed
    }
}

fn detach_in<E: Entity>(
    records: &mut [E],
    kind: EntityKind,
    id: EntityId,
    changed: &mut Vec<(EntityKind, EntityId)>,
) {
    for record in records.iter_mut() {
        if record.detach(kind, id) {
            changed.push((E::KIND, record.id()));
        }
    }
}
