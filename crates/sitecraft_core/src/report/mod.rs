//! Report snapshots and attendance exports.
//!
//! # Responsibility
//! - Assemble collections and derived aggregates into one timestamped,
//!   serializable document.
//! - Name and encode export files.
//!
//! # Invariants
//! - Report generation never fails; any kind label is accepted.
//! - The time range is carried as a label and never filters records.

mod export;

pub use export::{ExportFile, ReportError, ReportResult, EXPORT_MIME_TYPE};

use crate::derive::attendance::{attendance_state, AttendanceState};
use crate::derive::stats::{
    entity_counts, financial_summary, labor_stats, percent, project_spent, FinancialSummary,
    LaborStats,
};
use crate::model::material::MaterialStatus;
use crate::model::project::ProjectStatus;
use crate::model::{Collections, EntityId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Report selector. Labels outside the known set are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportKind {
    #[default]
    Overview,
    Projects,
    Materials,
    Labor,
    Financial,
    Other(String),
}

impl ReportKind {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "overview" => Self::Overview,
            "projects" => Self::Projects,
            "materials" => Self::Materials,
            "labor" => Self::Labor,
            "financial" => Self::Financial,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Overview => "overview",
            Self::Projects => "projects",
            Self::Materials => "materials",
            Self::Labor => "labor",
            Self::Financial => "financial",
            Self::Other(label) => label,
        }
    }
}

impl Display for ReportKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ReportKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ReportKind> for String {
    fn from(value: ReportKind) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReportLine {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub budget: f64,
    pub spent: f64,
    pub progress: u8,
    pub status: ProjectStatus,
    pub worker_count: u32,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialValuationLine {
    pub material: String,
    pub category: String,
    pub current_stock: u32,
    pub unit: String,
    pub unit_price: f64,
    pub value: f64,
    pub status: MaterialStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_budget: f64,
    pub material_costs: f64,
    /// Projects below 100% progress.
    pub active_projects: usize,
    pub total_workers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub projects: Vec<ProjectReportLine>,
    pub materials: Vec<MaterialValuationLine>,
    pub labor: LaborStats,
    pub financial: FinancialSummary,
    pub summary: ReportSummary,
}

/// Exportable snapshot of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub time_range: String,
    pub generated_at: DateTime<Utc>,
    pub data: ReportData,
}

/// Builds a report over `snapshot`. Every section is always populated.
pub fn generate_report(
    snapshot: &Collections,
    kind: ReportKind,
    time_range: &str,
    now: DateTime<Utc>,
) -> ReportDocument {
    let projects = snapshot
        .projects
        .iter()
        .map(|project| ProjectReportLine {
            id: project.id,
            name: project.name.clone(),
            location: project.location.clone(),
            budget: project.budget,
            spent: project_spent(project),
            progress: project.progress,
            status: project.status,
            worker_count: project.worker_count,
            manager: snapshot.manager_name(project.manager_id).map(str::to_string),
        })
        .collect();

    let materials = snapshot
        .materials
        .iter()
        .map(|material| MaterialValuationLine {
            material: material.name.clone(),
            category: material.category.clone(),
            current_stock: material.current_stock,
            unit: material.unit.clone(),
            unit_price: material.unit_price,
            value: material.stock_value(),
            status: material.status,
        })
        .collect();

    let financial = financial_summary(snapshot);
    let counts = entity_counts(snapshot);
    let summary = ReportSummary {
        total_budget: financial.total_budget,
        material_costs: financial.material_costs,
        active_projects: counts.active_projects,
        total_workers: counts.workers,
    };

    ReportDocument {
        kind,
        time_range: time_range.trim().to_string(),
        generated_at: now,
        data: ReportData {
            projects,
            materials,
            labor: labor_stats(&snapshot.workers),
            financial,
            summary,
        },
    }
}

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLine {
    pub name: String,
    pub role: String,
    pub project: Option<String>,
    pub status: String,
    pub check_in: String,
    pub check_out: String,
}

/// Daily attendance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub date: NaiveDate,
    pub total_workers: usize,
    pub present_workers: usize,
    /// Whole-number percentage.
    pub attendance_rate: u32,
    pub workers: Vec<AttendanceLine>,
}

/// Current attendance labelled with `date`.
pub fn attendance_report(snapshot: &Collections, date: NaiveDate) -> AttendanceReport {
    let workers: Vec<AttendanceLine> = snapshot
        .workers
        .iter()
        .map(|worker| AttendanceLine {
            name: worker.name.clone(),
            role: worker.role.clone(),
            project: snapshot.project_name(worker.project_id).map(str::to_string),
            status: match attendance_state(worker) {
                AttendanceState::Present => "Present",
                AttendanceState::Absent => "Absent",
            }
            .to_string(),
            check_in: clock_time(worker.check_in_time),
            check_out: clock_time(worker.check_out_time),
        })
        .collect();
    let present = snapshot.workers.iter().filter(|w| w.is_present).count();

    AttendanceReport {
        date,
        total_workers: workers.len(),
        present_workers: present,
        attendance_rate: percent(present, workers.len()),
        workers,
    }
}

fn clock_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
