use chrono::{NaiveDate, TimeZone, Utc};
use sitecraft_core::model::material::{Material, MaterialDraft};
use sitecraft_core::model::project::{Project, ProjectDraft, ProjectPatch};
use sitecraft_core::model::worker::{Worker, WorkerDraft};
use sitecraft_core::report::NOT_AVAILABLE;
use sitecraft_core::{
    attendance_report, generate_report, EntityStore, ExportFile, MemorySlotStore, ReportKind,
};

fn seeded_store() -> (EntityStore<MemorySlotStore>, Project, Worker, Worker) {
    let mut store = EntityStore::open(MemorySlotStore::new());
    let project: Project = store
        .create(ProjectDraft {
            name: "Harbor Tower".to_string(),
            location: "Pier 4".to_string(),
            budget: Some(2_000_000.0),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            ..ProjectDraft::default()
        })
        .unwrap();
    store
        .update::<Project>(
            project.id,
            ProjectPatch {
                progress: Some(35),
                ..ProjectPatch::default()
            },
        )
        .unwrap();
    store
        .create::<Material>(MaterialDraft {
            name: "Cement".to_string(),
            category: "Cement".to_string(),
            current_stock: Some(40),
            minimum_stock: Some(50),
            unit: "bags".to_string(),
            unit_price: Some(8.0),
            supplier: String::new(),
        })
        .unwrap();
    let smith: Worker = store
        .create(WorkerDraft {
            name: "A. Smith".to_string(),
            phone: "555-0111".to_string(),
            role: "Mason".to_string(),
            hourly_rate: Some(25.0),
            project_id: Some(project.id),
        })
        .unwrap();
    let jones: Worker = store
        .create(WorkerDraft {
            name: "B. Jones".to_string(),
            phone: "555-0112".to_string(),
            role: "Electrician".to_string(),
            hourly_rate: Some(40.0),
            project_id: Some(project.id),
        })
        .unwrap();
    (store, project, smith, jones)
}

#[test]
fn overview_report_combines_sections() {
    let (mut store, _, smith, _) = seeded_store();
    store.toggle_attendance(smith.id).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

    let report = generate_report(store.collections(), ReportKind::Overview, "quarter", now);
    assert_eq!(report.generated_at, now);
    assert_eq!(report.time_range, "quarter");

    let data = &report.data;
    assert_eq!(data.projects.len(), 1);
    assert_eq!(data.projects[0].spent, 700_000.0);
    assert_eq!(data.projects[0].worker_count, 2);
    assert_eq!(data.materials[0].value, 320.0);
    assert_eq!(data.labor.present_workers, 1);
    assert_eq!(data.labor.daily_labor_cost, 200.0);
    assert_eq!(data.summary.total_budget, 2_000_000.0);
    assert_eq!(data.summary.material_costs, 320.0);
    assert_eq!(data.summary.active_projects, 1);
    assert_eq!(data.summary.total_workers, 2);
    assert_eq!(data.financial.budget_utilization, 0.35);
}

#[test]
fn time_range_does_not_filter_records() {
    let (store, _, _, _) = seeded_store();
    let now = Utc::now();
    let week = generate_report(store.collections(), ReportKind::Projects, "week", now);
    let year = generate_report(store.collections(), ReportKind::Projects, "year", now);
    assert_eq!(week.data, year.data);
}

#[test]
fn unknown_kind_is_kept_in_document_and_file_name() {
    let (store, _, _, _) = seeded_store();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let report = generate_report(store.collections(), ReportKind::parse("safety"), "month", now);

    let export = ExportFile::from_report(&report).unwrap();
    assert_eq!(export.file_name, "sitecraft-report-safety-2026-10-16.json");
    let json: serde_json::Value = serde_json::from_str(&export.contents).unwrap();
    assert_eq!(json["type"], "safety");
    assert_eq!(json["data"]["materials"][0]["status"], "Low Stock");
}

#[test]
fn attendance_report_lists_every_worker() {
    let (mut store, _, smith, _) = seeded_store();
    let check_in = Utc.with_ymd_and_hms(2026, 10, 16, 7, 30, 0).unwrap();
    store.toggle_attendance_at(smith.id, check_in).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let sheet = attendance_report(store.collections(), date);
    assert_eq!(sheet.total_workers, 2);
    assert_eq!(sheet.present_workers, 1);
    assert_eq!(sheet.attendance_rate, 50);

    let smith_line = &sheet.workers[0];
    assert_eq!(smith_line.status, "Present");
    assert_eq!(smith_line.check_in, "07:30");
    assert_eq!(smith_line.check_out, NOT_AVAILABLE);
    assert_eq!(smith_line.project.as_deref(), Some("Harbor Tower"));
    assert_eq!(sheet.workers[1].status, "Absent");
    assert_eq!(sheet.workers[1].check_in, NOT_AVAILABLE);

    let export = ExportFile::from_attendance(&sheet).unwrap();
    assert_eq!(export.file_name, "attendance-report-2026-10-16.json");
    assert!(export.contents.contains("\"checkIn\": \"07:30\""));
}
