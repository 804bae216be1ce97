//! Aggregate statistics over the current collections.
//!
//! # Invariants
//! - Empty inputs produce zero-valued results.
//! - Ratios are in `0.0..=1.0`; percentages are rounded whole numbers.

use super::task_flow::is_past_due;
use crate::model::document::Document;
use crate::model::material::{Material, MaterialStatus};
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::model::worker::Worker;
use crate::model::Collections;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paid hours counted per present worker per day.
pub const SHIFT_HOURS: f64 = 8.0;

/// Present workers over all workers; `0.0` when there are none.
pub fn attendance_rate(workers: &[Worker]) -> f64 {
    ratio(present_count(workers), workers.len())
}

pub fn present_count(workers: &[Worker]) -> usize {
    workers.iter().filter(|worker| worker.is_present).count()
}

/// Sum of one shift's pay over present workers.
pub fn daily_labor_cost(workers: &[Worker]) -> f64 {
    workers
        .iter()
        .filter(|worker| worker.is_present)
        .map(|worker| worker.hourly_rate * SHIFT_HOURS)
        .sum()
}

/// Sum of `current_stock * unit_price` over all materials.
pub fn inventory_value(materials: &[Material]) -> f64 {
    materials.iter().map(Material::stock_value).sum()
}

pub fn low_stock_count(materials: &[Material]) -> usize {
    materials.iter().filter(|m| m.is_low_stock()).count()
}

/// Budget consumed so far, assuming spend tracks progress.
pub fn project_spent(project: &Project) -> f64 {
    project.budget * f64::from(project.progress) / 100.0
}

/// Spent share of the budget; `0.0` for a zero budget.
pub fn budget_utilization(project: &Project) -> f64 {
    if project.budget > 0.0 {
        project_spent(project) / project.budget
    } else {
        0.0
    }
}

/// Whole-number percentage of `part / total`, `0` when `total == 0`.
pub fn percent(part: usize, total: usize) -> u32 {
    (ratio(part, total) * 100.0).round() as u32
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Record counts per kind plus the "active" subset of each.
///
/// Active means: projects below 100% progress, present workers, tasks not
/// completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub projects: usize,
    pub active_projects: usize,
    pub materials: usize,
    pub workers: usize,
    pub present_workers: usize,
    pub tasks: usize,
    pub active_tasks: usize,
    pub managers: usize,
    pub documents: usize,
}

pub fn entity_counts(collections: &Collections) -> EntityCounts {
    EntityCounts {
        projects: collections.projects.len(),
        active_projects: collections
            .projects
            .iter()
            .filter(|project| project.progress < 100)
            .count(),
        materials: collections.materials.len(),
        workers: collections.workers.len(),
        present_workers: present_count(&collections.workers),
        tasks: collections.tasks.len(),
        active_tasks: collections
            .tasks
            .iter()
            .filter(|task| task.status != TaskStatus::Completed)
            .count(),
        managers: collections.managers.len(),
        documents: collections.documents.len(),
    }
}

/// Headline numbers for the dashboard landing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub counts: EntityCounts,
    pub low_stock_count: usize,
    pub attendance_rate: f64,
    pub daily_labor_cost: f64,
    pub inventory_value: f64,
}

pub fn dashboard_stats(collections: &Collections) -> DashboardStats {
    DashboardStats {
        counts: entity_counts(collections),
        low_stock_count: low_stock_count(&collections.materials),
        attendance_rate: attendance_rate(&collections.workers),
        daily_labor_cost: daily_labor_cost(&collections.workers),
        inventory_value: inventory_value(&collections.materials),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborStats {
    pub total_workers: usize,
    pub present_workers: usize,
    pub attendance_rate: f64,
    pub attendance_percent: u32,
    pub total_hours: f64,
    pub daily_labor_cost: f64,
}

pub fn labor_stats(workers: &[Worker]) -> LaborStats {
    let present = present_count(workers);
    LaborStats {
        total_workers: workers.len(),
        present_workers: present,
        attendance_rate: attendance_rate(workers),
        attendance_percent: percent(present, workers.len()),
        total_hours: present as f64 * SHIFT_HOURS,
        daily_labor_cost: daily_labor_cost(workers),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    pub low_stock: usize,
    pub in_stock: usize,
    pub well_stocked: usize,
    pub total_value: f64,
}

pub fn inventory_stats(materials: &[Material]) -> InventoryStats {
    let mut stats = InventoryStats {
        total_items: materials.len(),
        total_value: inventory_value(materials),
        ..InventoryStats::default()
    };
    for material in materials {
        match material.status {
            MaterialStatus::LowStock => stats.low_stock += 1,
            MaterialStatus::InStock => stats.in_stock += 1,
            MaterialStatus::WellStocked => stats.well_stocked += 1,
        }
    }
    stats
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
    /// Open tasks whose due date has passed, whatever their status says.
    pub past_due: usize,
}

pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Overdue => stats.overdue += 1,
        }
        if is_past_due(task, today) {
            stats.past_due += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
}

pub fn document_stats(documents: &[Document]) -> DocumentStats {
    let mut by_category = BTreeMap::new();
    for document in documents {
        *by_category.entry(document.category.clone()).or_insert(0) += 1;
    }
    DocumentStats {
        total: documents.len(),
        by_category,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub on_track: usize,
    pub ahead: usize,
    pub delayed: usize,
    pub average_progress: f64,
}

pub fn project_stats(projects: &[Project]) -> ProjectStats {
    let mut stats = ProjectStats {
        total: projects.len(),
        ..ProjectStats::default()
    };
    let mut progress_sum = 0.0;
    for project in projects {
        match project.status {
            ProjectStatus::OnTrack => stats.on_track += 1,
            ProjectStatus::Ahead => stats.ahead += 1,
            ProjectStatus::Delayed => stats.delayed += 1,
        }
        progress_sum += f64::from(project.progress);
    }
    if !projects.is_empty() {
        stats.average_progress = progress_sum / projects.len() as f64;
    }
    stats
}

/// Portfolio-wide money figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_budget: f64,
    pub total_spent: f64,
    pub budget_utilization: f64,
    pub material_costs: f64,
    pub daily_labor_cost: f64,
}

pub fn financial_summary(collections: &Collections) -> FinancialSummary {
    let total_budget: f64 = collections.projects.iter().map(|p| p.budget).sum();
    let total_spent: f64 = collections.projects.iter().map(project_spent).sum();
    FinancialSummary {
        total_budget,
        total_spent,
        budget_utilization: if total_budget > 0.0 {
            total_spent / total_budget
        } else {
            0.0
        },
        material_costs: inventory_value(&collections.materials),
        daily_labor_cost: daily_labor_cost(&collections.workers),
    }
}
