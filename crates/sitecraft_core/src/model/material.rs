//! Material (inventory line) record.
//!
//! # Invariants
//! - `status == material_status(current_stock, minimum_stock)` after every
//!   create, update and load.
//! - `last_updated` is the UTC date of the latest create or edit.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use crate::derive::stock::material_status;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Supplier recorded when the form leaves it blank.
pub const UNSPECIFIED_SUPPLIER: &str = "Not specified";

/// Stock level band relative to the minimum stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialStatus {
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Well Stocked")]
    WellStocked,
}

impl MaterialStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
            Self::WellStocked => "Well Stocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: EntityId,
    pub name: String,
    pub category: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
    pub unit: String,
    pub unit_price: f64,
    pub supplier: String,
    pub status: MaterialStatus,
    pub last_updated: NaiveDate,
}

impl Material {
    /// Stock value of this line (`current_stock * unit_price`).
    pub fn stock_value(&self) -> f64 {
        f64::from(self.current_stock) * self.unit_price
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock < self.minimum_stock
    }
}

/// Material creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDraft {
    pub name: String,
    pub category: String,
    pub current_stock: Option<u32>,
    pub minimum_stock: Option<u32>,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub supplier: String,
}

/// Material edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<u32>,
    pub minimum_stock: Option<u32>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
}

impl Entity for Material {
    const KIND: EntityKind = EntityKind::Material;
    const MUST_KEEP_ONE: bool = true;
    type Draft = MaterialDraft;
    type Patch = MaterialPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: MaterialDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &draft.name)
            .text("category", &draft.category)
            .present("currentStock", &draft.current_stock)
            .present("minimumStock", &draft.minimum_stock)
            .text("unit", &draft.unit)
            .present("unitPrice", &draft.unit_price);
        if let Some(unit_price) = draft.unit_price {
            check.amount("unitPrice", unit_price);
        }
        check.finish()?;

        let current_stock = draft.current_stock.unwrap_or_default();
        let minimum_stock = draft.minimum_stock.unwrap_or_default();

        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            current_stock,
            minimum_stock,
            unit: draft.unit.trim().to_string(),
            unit_price: draft.unit_price.unwrap_or_default(),
            supplier: supplier_or_default(&draft.supplier),
            status: material_status(current_stock, minimum_stock),
            last_updated: now.date_naive(),
        })
    }

    fn apply_patch(&mut self, patch: MaterialPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(current_stock) = patch.current_stock {
            self.current_stock = current_stock;
        }
        if let Some(minimum_stock) = patch.minimum_stock {
            self.minimum_stock = minimum_stock;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit.trim().to_string();
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier_or_default(&supplier);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &self.name)
            .text("category", &self.category)
            .text("unit", &self.unit)
            .amount("unitPrice", self.unit_price);
        check.finish()
    }

    fn refresh_derived(&mut self) {
        self.status = material_status(self.current_stock, self.minimum_stock);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now.date_naive();
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.materials
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.materials
    }
}

fn supplier_or_default(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_SUPPLIER.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Material, MaterialDraft, MaterialPatch, MaterialStatus, UNSPECIFIED_SUPPLIER};
    use crate::model::Entity;
    use chrono::Utc;

    fn cement() -> MaterialDraft {
        MaterialDraft {
            name: "Cement".to_string(),
            category: "Cement".to_string(),
            current_stock: Some(40),
            minimum_stock: Some(50),
            unit: "bags".to_string(),
            unit_price: Some(8.0),
            supplier: String::new(),
        }
    }

    #[test]
    fn blank_supplier_defaults_to_not_specified() {
        let material = Material::from_draft(1, cement(), Utc::now()).unwrap();
        assert_eq!(material.supplier, UNSPECIFIED_SUPPLIER);
        assert_eq!(material.status, MaterialStatus::LowStock);
    }

    #[test]
    fn refresh_follows_patched_quantities() {
        let mut material = Material::from_draft(1, cement(), Utc::now()).unwrap();
        material.apply_patch(MaterialPatch {
            current_stock: Some(80),
            ..MaterialPatch::default()
        });
        assert_eq!(material.status, MaterialStatus::LowStock);
        material.refresh_derived();
        assert_eq!(material.status, MaterialStatus::WellStocked);
    }

    #[test]
    fn status_uses_dashboard_labels_on_the_wire() {
        let material = Material::from_draft(1, cement(), Utc::now()).unwrap();
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["status"], "Low Stock");
        assert_eq!(json["currentStock"], 40);
        assert_eq!(json["unitPrice"], 8.0);
    }
}
