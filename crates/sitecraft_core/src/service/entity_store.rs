//! Authoritative in-memory entity store.
//!
//! # Responsibility
//! - Own the six collections and be the only code path that mutates them.
//! - Assign ids, apply defaults, validate submissions and references.
//! - Persist every affected slot after each successful mutation.
//! - Notify subscribers so views can re-read derived values.
//!
//! # Invariants
//! - A failed operation leaves collections and slots untouched.
//! - Removing a record never fails because of inbound references; those
//!   references are cleared instead.
//! - Kinds with `Entity::MUST_KEEP_ONE` never lose their last record.
//! - Slot save failures are logged and do not undo the in-memory change.

use crate::derive::attendance::attendance_toggle;
use crate::derive::stats::{dashboard_stats, DashboardStats};
use crate::derive::task_flow::task_status_transition;
use crate::model::task::{Task, TaskStatus};
use crate::model::validation::{FieldCheck, ValidationError};
use crate::model::worker::Worker;
use crate::model::{Collections, Entity, EntityId, EntityKind};
use crate::repo::slot_repo::{load_collection, save_collection, SlotStore};
use crate::service::ids::IdAllocator;
use crate::service::search::{ListQuery, Searchable};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// User-recoverable rejection of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Missing or invalid form fields.
    Validation(ValidationError),
    /// No record of `kind` has `id`.
    NotFound { kind: EntityKind, id: EntityId },
    /// The operation would break a collection-level rule.
    InvariantViolation(String),
}

impl StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvariantViolation(message) => f.write_str(message),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Created,
    Updated,
    Removed,
}

/// Notification delivered to subscribers after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub id: EntityId,
    pub action: ChangeAction,
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Single source of truth for all collections, backed by durable slots.
pub struct EntityStore<S: SlotStore> {
    slots: S,
    collections: Collections,
    ids: IdAllocator,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<S: SlotStore> EntityStore<S> {
    /// Loads every slot and returns a ready store.
    ///
    /// Absent or unreadable slots start as empty collections.
    pub fn open(slots: S) -> Self {
        let collections = load_all(&slots);
        let ids = IdAllocator::starting_after(collections.max_id());
        info!(
            "event=store_open module=store status=ok projects={} materials={} workers={} tasks={} managers={} documents={}",
            collections.projects.len(),
            collections.materials.len(),
            collections.workers.len(),
            collections.tasks.len(),
            collections.managers.len(),
            collections.documents.len()
        );
        Self {
            slots,
            collections,
            ids,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Discards in-memory state and reloads every slot.
    pub fn reload(&mut self) {
        self.collections = load_all(&self.slots);
        let floor = self.collections.max_id().max(self.ids.last_issued());
        self.ids = IdAllocator::starting_after(floor);
        info!("event=store_reload module=store status=ok");
    }

    /// Read-only view for derivations and report generation.
    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Owned copy of every collection.
    pub fn snapshot(&self) -> Collections {
        self.collections.clone()
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        dashboard_stats(&self.collections)
    }

    pub fn get<E: Entity>(&self, id: EntityId) -> Option<E> {
        E::collection(&self.collections)
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Snapshot of the whole collection in insertion order.
    pub fn list<E: Entity>(&self) -> Vec<E> {
        E::collection(&self.collections).clone()
    }

    /// Snapshot of the records accepted by `filter`.
    pub fn list_where<E: Entity>(&self, filter: impl Fn(&E) -> bool) -> Vec<E> {
        E::collection(&self.collections)
            .iter()
            .filter(|record| filter(record))
            .cloned()
            .collect()
    }

    /// Snapshot of the records matching a list view's search and category.
    pub fn search<E: Searchable>(&self, query: &ListQuery) -> Vec<E> {
        self.list_where(|record: &E| query.matches(record))
    }

    /// Creates a record from a submitted form.
    ///
    /// # Errors
    /// - `StoreError::Validation` listing missing/invalid fields, including
    ///   references to records that do not exist.
    pub fn create<E: Entity>(&mut self, draft: E::Draft) -> StoreResult<E> {
        self.create_at(draft, Utc::now())
    }

    /// `create` with an explicit creation time.
    pub fn create_at<E: Entity>(&mut self, draft: E::Draft, now: DateTime<Utc>) -> StoreResult<E> {
        let result = self.try_create(draft, now);
        log_outcome(E::KIND, "create", &result);
        result
    }

    /// Merges `patch` into the record with `id`.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no record has `id`.
    /// - `StoreError::Validation` when the merged record is invalid.
    pub fn update<E: Entity>(&mut self, id: EntityId, patch: E::Patch) -> StoreResult<E> {
        self.update_at(id, patch, Utc::now())
    }

    /// `update` with an explicit edit time.
    pub fn update_at<E: Entity>(
        &mut self,
        id: EntityId,
        patch: E::Patch,
        now: DateTime<Utc>,
    ) -> StoreResult<E> {
        let result = self.try_update(id, patch, now);
        log_outcome(E::KIND, "update", &result);
        result
    }

    /// Removes the record with `id` and clears references to it.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no record has `id`.
    /// - `StoreError::InvariantViolation` when removing the last record of a
    ///   kind that must keep one.
    pub fn remove<E: Entity>(&mut self, id: EntityId) -> StoreResult<E> {
        let result = self.try_remove(id);
        log_outcome(E::KIND, "remove", &result);
        result
    }

    /// Flips a worker between present and absent at the current time.
    pub fn toggle_attendance(&mut self, id: EntityId) -> StoreResult<Worker> {
        self.toggle_attendance_at(id, Utc::now())
    }

    pub fn toggle_attendance_at(&mut self, id: EntityId, now: DateTime<Utc>) -> StoreResult<Worker> {
        let result = self.position::<Worker>(id).map(|index| {
            let next = attendance_toggle(&self.collections.workers[index], now);
            self.collections.workers[index] = next.clone();
            self.commit(EntityKind::Worker, id, ChangeAction::Updated);
            next
        });
        log_outcome(EntityKind::Worker, "toggle_attendance", &result);
        result
    }

    /// Moves a task to `status`, adjusting progress by the transition rules.
    pub fn set_task_status(&mut self, id: EntityId, status: TaskStatus) -> StoreResult<Task> {
        let result = self.position::<Task>(id).map(|index| {
            let next = task_status_transition(&self.collections.tasks[index], status);
            self.collections.tasks[index] = next.clone();
            self.commit(EntityKind::Task, id, ChangeAction::Updated);
            next
        });
        log_outcome(EntityKind::Task, "set_task_status", &result);
        result
    }

    /// Registers `listener` for every subsequent change.
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drops a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    fn try_create<E: Entity>(&mut self, draft: E::Draft, now: DateTime<Utc>) -> StoreResult<E> {
        let id = self.ids.next(now);
        let mut record = E::from_draft(id, draft, now)?;
        record.refresh_derived();
        self.check_references(&record)?;

        E::collection_mut(&mut self.collections).push(record.clone());
        self.commit(E::KIND, id, ChangeAction::Created);
        Ok(record)
    }

    fn try_update<E: Entity>(
        &mut self,
        id: EntityId,
        patch: E::Patch,
        now: DateTime<Utc>,
    ) -> StoreResult<E> {
        let index = self.position::<E>(id)?;
        let mut updated = E::collection(&self.collections)[index].clone();
        updated.apply_patch(patch);
        updated.touch(now);
        updated.refresh_derived();
        updated.validate()?;
        self.check_references(&updated)?;

        E::collection_mut(&mut self.collections)[index] = updated.clone();
        self.commit(E::KIND, id, ChangeAction::Updated);
        Ok(updated)
    }

    fn try_remove<E: Entity>(&mut self, id: EntityId) -> StoreResult<E> {
        let index = self.position::<E>(id)?;
        if E::MUST_KEEP_ONE && E::collection(&self.collections).len() == 1 {
            return Err(StoreError::InvariantViolation(format!(
                "cannot remove the last {}; at least one must remain",
                E::KIND
            )));
        }

        let removed = E::collection_mut(&mut self.collections).remove(index);
        self.commit(E::KIND, id, ChangeAction::Removed);

        let detached = self.collections.detach_references(E::KIND, id);
        let kinds: BTreeSet<EntityKind> = detached.iter().map(|(kind, _)| *kind).collect();
        for kind in kinds {
            self.persist(kind);
        }
        for (kind, detached_id) in detached {
            self.notify(ChangeEvent {
                kind,
                id: detached_id,
                action: ChangeAction::Updated,
            });
        }
        Ok(removed)
    }

    fn position<E: Entity>(&self, id: EntityId) -> StoreResult<usize> {
        E::collection(&self.collections)
            .iter()
            .position(|record| record.id() == id)
            .ok_or(StoreError::NotFound { kind: E::KIND, id })
    }

    fn check_references<E: Entity>(&self, record: &E) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        if let Some(project_id) = record.project_ref() {
            if self.collections.project(project_id).is_none() {
                check.reject("projectId", format!("no project with id {project_id}"));
            }
        }
        if let Some(manager_id) = record.manager_ref() {
            if self.collections.manager(manager_id).is_none() {
                check.reject("managerId", format!("no project manager with id {manager_id}"));
            }
        }
        check.finish()
    }

    /// Persists `kind`, notifies, and keeps project worker counts current.
    fn commit(&mut self, kind: EntityKind, id: EntityId, action: ChangeAction) {
        self.persist(kind);
        self.notify(ChangeEvent { kind, id, action });

        if matches!(kind, EntityKind::Worker | EntityKind::Project) {
            let recounted = self.collections.recount_workers();
            if !recounted.is_empty() {
                self.persist(EntityKind::Project);
                for project_id in recounted {
                    self.notify(ChangeEvent {
                        kind: EntityKind::Project,
                        id: project_id,
                        action: ChangeAction::Updated,
                    });
                }
            }
        }
    }

    fn persist(&self, kind: EntityKind) {
        let collections = &self.collections;
        let result = match kind {
            EntityKind::Project => save_collection(&self.slots, kind, &collections.projects),
            EntityKind::Material => save_collection(&self.slots, kind, &collections.materials),
            EntityKind::Worker => save_collection(&self.slots, kind, &collections.workers),
            EntityKind::Task => save_collection(&self.slots, kind, &collections.tasks),
            EntityKind::Manager => save_collection(&self.slots, kind, &collections.managers),
            EntityKind::Document => save_collection(&self.slots, kind, &collections.documents),
        };
        if let Err(err) = result {
            error!(
                "event=slot_save module=store status=error kind={kind} error_code=slot_write_failed error={err}"
            );
        }
    }

    fn notify(&mut self, event: ChangeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

fn load_all<S: SlotStore>(slots: &S) -> Collections {
    let mut collections = Collections {
        projects: load_collection(slots, EntityKind::Project),
        materials: load_collection(slots, EntityKind::Material),
        workers: load_collection(slots, EntityKind::Worker),
        tasks: load_collection(slots, EntityKind::Task),
        managers: load_collection(slots, EntityKind::Manager),
        documents: load_collection(slots, EntityKind::Document),
    };
    collections.refresh_derived();
    collections
}

fn log_outcome<E: Entity>(kind: EntityKind, operation: &str, result: &StoreResult<E>) {
    match result {
        Ok(record) => info!(
            "event=entity_{operation} module=store status=ok kind={kind} id={}",
            record.id()
        ),
        Err(err) => warn!(
            "event=entity_{operation} module=store status=rejected kind={kind} error_code={} error={err}",
            err.error_code()
        ),
    }
}
