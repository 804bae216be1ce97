//! Text search and category filtering for list views.
//!
//! # Invariants
//! - Matching is case-insensitive substring matching on trimmed terms.
//! - An empty query matches every record.

use crate::model::document::Document;
use crate::model::manager::ProjectManager;
use crate::model::material::Material;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::worker::Worker;
use crate::model::Entity;

/// Filter submitted by a list view's search box and category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Free-text term; blank means no text filter.
    pub text: Option<String>,
    /// Category label (status label for tasks); `"all"` or blank means any.
    pub category: Option<String>,
}

impl ListQuery {
    pub fn text(term: impl Into<String>) -> Self {
        Self {
            text: Some(term.into()),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns whether `record` passes both filters.
    pub fn matches<E: Searchable>(&self, record: &E) -> bool {
        self.matches_text(record) && self.matches_category(record)
    }

    fn matches_text<E: Searchable>(&self, record: &E) -> bool {
        let Some(term) = normalized(self.text.as_deref()) else {
            return true;
        };
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_category<E: Searchable>(&self, record: &E) -> bool {
        let Some(category) = normalized(self.category.as_deref()) else {
            return true;
        };
        if category == "all" {
            return true;
        }
        record
            .category_label()
            .is_some_and(|label| label.to_lowercase() == category)
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Record kinds that list views can search.
pub trait Searchable: Entity {
    /// Fields matched by the free-text term.
    fn search_fields(&self) -> Vec<&str>;

    /// Label matched by the category selector.
    fn category_label(&self) -> Option<&str> {
        None
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.as_str()]
    }
}

impl Searchable for Material {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.supplier.as_str()]
    }

    fn category_label(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl Searchable for Worker {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.role.as_str()]
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.assignee.as_str()]
    }

    fn category_label(&self) -> Option<&str> {
        Some(self.status.label())
    }
}

impl Searchable for ProjectManager {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.specialization.as_str()]
    }
}

impl Searchable for Document {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.uploaded_by.as_str()]
    }

    fn category_label(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}
