//! CLI probe for a dashboard data directory.
//!
//! # Responsibility
//! - Verify `sitecraft_core` linkage and storage against a real directory.
//! - Print headline figures and write one report export.
//!
//! Usage: `sitecraft_cli <data_dir> [report-kind]`

use chrono::Utc;
use sitecraft_core::repo::slot_repo::SqliteSlotStore;
use sitecraft_core::{generate_report, open_db, CoreConfig, EntityStore, ExportFile, ReportKind};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("sitecraft_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    println!("sitecraft_core ping={}", sitecraft_core::ping());
    println!("sitecraft_core version={}", sitecraft_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(data_dir) = args.next() else {
        println!("usage: sitecraft_cli <data_dir> [report-kind]");
        return Ok(());
    };
    let kind = ReportKind::parse(&args.next().unwrap_or_else(|| "overview".to_string()));

    let config = CoreConfig::new(absolute(PathBuf::from(data_dir))?);
    config.init_logging()?;

    let conn = open_db(config.db_path()).map_err(|err| format!("database open failed: {err}"))?;
    let store = EntityStore::open(SqliteSlotStore::new(&conn));

    let stats = store.dashboard_stats();
    println!(
        "projects={} materials={} workers={} tasks={} managers={} documents={}",
        stats.counts.projects,
        stats.counts.materials,
        stats.counts.workers,
        stats.counts.tasks,
        stats.counts.managers,
        stats.counts.documents
    );
    println!(
        "low_stock={} attendance_rate={:.2} daily_labor_cost={:.2} inventory_value={:.2}",
        stats.low_stock_count, stats.attendance_rate, stats.daily_labor_cost, stats.inventory_value
    );

    let report = generate_report(store.collections(), kind, "month", Utc::now());
    let export = ExportFile::from_report(&report).map_err(|err| err.to_string())?;
    let path = export
        .write_to_dir(&config.export_dir())
        .map_err(|err| err.to_string())?;
    println!("report={}", path.display());
    Ok(())
}

fn absolute(path: PathBuf) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|err| format!("cannot resolve cwd: {err}"))?;
    Ok(cwd.join(path))
}
