use chrono::{NaiveDate, TimeZone, Utc};
use sitecraft_core::derive::attendance::attendance_consistent;
use sitecraft_core::model::document::{Document, DocumentDraft, DocumentType};
use sitecraft_core::model::material::{Material, MaterialDraft};
use sitecraft_core::model::project::{Project, ProjectDraft};
use sitecraft_core::model::worker::{Worker, WorkerDraft};
use sitecraft_core::repo::slot_repo::{load_collection, save_collection};
use sitecraft_core::{
    open_db, open_db_in_memory, EntityKind, EntityStore, MemorySlotStore, SlotStore,
    SqliteSlotStore,
};

fn project_draft() -> ProjectDraft {
    ProjectDraft {
        name: "Harbor Tower".to_string(),
        location: "Pier 4".to_string(),
        budget: Some(2_000_000.0),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2027, 6, 30),
        ..ProjectDraft::default()
    }
}

fn seed<S: SlotStore>(store: &mut EntityStore<S>) -> (Project, Worker) {
    let project: Project = store.create(project_draft()).unwrap();
    store
        .create::<Material>(MaterialDraft {
            name: "Cement".to_string(),
            category: "Cement".to_string(),
            current_stock: Some(40),
            minimum_stock: Some(50),
            unit: "bags".to_string(),
            unit_price: Some(8.0),
            supplier: "Atlas Supply".to_string(),
        })
        .unwrap();
    let worker: Worker = store
        .create(WorkerDraft {
            name: "A. Smith".to_string(),
            phone: "555-0111".to_string(),
            role: "Mason".to_string(),
            hourly_rate: Some(25.0),
            project_id: Some(project.id),
        })
        .unwrap();
    store
        .create::<Document>(DocumentDraft {
            name: "Site plan".to_string(),
            category: "Blueprints".to_string(),
            project_id: Some(project.id),
            file_name: "site-plan.pdf".to_string(),
            size_bytes: 1_048_576,
            uploaded_by: "L. Chen".to_string(),
        })
        .unwrap();
    (project, worker)
}

#[test]
fn sqlite_slots_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitecraft.sqlite3");
    let check_in = Utc.with_ymd_and_hms(2026, 10, 16, 7, 15, 0).unwrap();

    let before = {
        let conn = open_db(&path).unwrap();
        let mut store = EntityStore::open(SqliteSlotStore::new(&conn));
        let (_, worker) = seed(&mut store);
        store.toggle_attendance_at(worker.id, check_in).unwrap();
        store.snapshot()
    };

    let conn = open_db(&path).unwrap();
    let store = EntityStore::open(SqliteSlotStore::new(&conn));
    assert_eq!(store.snapshot(), before);

    let worker = &store.collections().workers[0];
    assert!(worker.is_present);
    assert_eq!(worker.check_in_time, Some(check_in));
    assert_eq!(store.collections().projects[0].worker_count, 1);
    assert_eq!(store.collections().documents[0].doc_type, DocumentType::Pdf);
    assert_eq!(store.collections().documents[0].size, "1.0 MB");
}

#[test]
fn new_ids_stay_above_loaded_ids() {
    let slots = MemorySlotStore::new();
    let first_project = {
        let mut store = EntityStore::open(&slots);
        store.create::<Project>(project_draft()).unwrap()
    };

    let mut reopened = EntityStore::open(&slots);
    let second: Project = reopened.create(project_draft()).unwrap();
    assert!(second.id > first_project.id);
}

#[test]
fn corrupt_slot_loads_as_empty_and_others_still_load() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::new(&conn);
    {
        let mut store = EntityStore::open(&slots);
        seed(&mut store);
    }
    slots
        .write_slot(EntityKind::Worker.slot_key(), "[{\"broken\":")
        .unwrap();

    let store = EntityStore::open(&slots);
    assert!(store.collections().workers.is_empty());
    assert_eq!(store.collections().projects.len(), 1);
    assert_eq!(store.collections().projects[0].worker_count, 0);
    assert_eq!(store.collections().materials.len(), 1);
}

#[test]
fn stale_derived_fields_are_refreshed_on_load() {
    let slots = MemorySlotStore::new();
    {
        let mut store = EntityStore::open(&slots);
        seed(&mut store);
    }

    let mut materials: Vec<serde_json::Value> = load_collection(&slots, EntityKind::Material);
    materials[0]["status"] = serde_json::Value::from("Well Stocked");
    save_collection(&slots, EntityKind::Material, &materials).unwrap();

    let store = EntityStore::open(&slots);
    assert_eq!(
        store.collections().materials[0].status.label(),
        "Low Stock"
    );
}

#[test]
fn contradicting_attendance_is_repaired_on_load() {
    let slots = MemorySlotStore::new();
    {
        let mut store = EntityStore::open(&slots);
        seed(&mut store);
    }

    let mut workers: Vec<serde_json::Value> = load_collection(&slots, EntityKind::Worker);
    workers[0]["isPresent"] = serde_json::Value::from(true);
    workers[0]["checkInTime"] = serde_json::Value::Null;
    save_collection(&slots, EntityKind::Worker, &workers).unwrap();

    let store = EntityStore::open(&slots);
    let worker = &store.collections().workers[0];
    assert!(!worker.is_present);
    assert!(attendance_consistent(worker));
    assert_eq!(store.dashboard_stats().daily_labor_cost, 0.0);
}

#[test]
fn reload_picks_up_external_writes() {
    let slots = MemorySlotStore::new();
    let mut store = EntityStore::open(&slots);
    seed(&mut store);

    slots.write_slot(EntityKind::Document.slot_key(), "[]").unwrap();
    assert_eq!(store.collections().documents.len(), 1);

    store.reload();
    assert!(store.collections().documents.is_empty());
}

#[test]
fn slot_payload_uses_camel_case_fields() {
    let slots = MemorySlotStore::new();
    let mut store = EntityStore::open(&slots);
    seed(&mut store);

    let payload = slots.payload("sitecraft-materials").unwrap();
    assert!(payload.contains("\"currentStock\":40"));
    assert!(payload.contains("\"status\":\"Low Stock\""));
}
