//! Document record (uploaded site file metadata).
//!
//! # Invariants
//! - `extension` is the lowercase suffix of `file_name`, without the dot.
//! - `doc_type == document_type_for(&extension)` after every create,
//!   update and load.

use super::entity::{Collections, Entity};
use super::validation::{FieldCheck, ValidationError};
use super::{EntityId, EntityKind};
use crate::derive::files::{document_type_for, file_extension, file_stem, human_size};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File family shown by document views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Excel,
    Images,
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub name: String,
    pub category: String,
    pub project_id: Option<EntityId>,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Human-readable size, e.g. `"2.4 MB"`.
    pub size: String,
    pub uploaded_by: String,
    pub upload_date: DateTime<Utc>,
    pub file_name: String,
    pub extension: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentDraft {
    pub name: String,
    pub category: String,
    pub project_id: Option<EntityId>,
    pub file_name: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub project_id: Option<EntityId>,
    pub file_name: Option<String>,
    /// Byte size of a replacement upload; sent together with `file_name`.
    pub size_bytes: Option<u64>,
    pub uploaded_by: Option<String>,
}

impl Entity for Document {
    const KIND: EntityKind = EntityKind::Document;
    type Draft = DocumentDraft;
    type Patch = DocumentPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(
        id: EntityId,
        draft: DocumentDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &draft.name)
            .text("category", &draft.category)
            .present("projectId", &draft.project_id)
            .text("fileName", &draft.file_name)
            .text("uploadedBy", &draft.uploaded_by);
        check_file_name(&mut check, &draft.file_name);
        check.finish()?;

        let file_name = draft.file_name.trim().to_string();
        let extension = file_extension(&file_name);
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            project_id: draft.project_id,
            doc_type: document_type_for(&extension),
            size: human_size(draft.size_bytes),
            uploaded_by: draft.uploaded_by.trim().to_string(),
            upload_date: now,
            file_name,
            extension,
        })
    }

    fn apply_patch(&mut self, patch: DocumentPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
        if let Some(file_name) = patch.file_name {
            self.file_name = file_name.trim().to_string();
        }
        if let Some(size_bytes) = patch.size_bytes {
            self.size = human_size(size_bytes);
        }
        if let Some(uploaded_by) = patch.uploaded_by {
            self.uploaded_by = uploaded_by.trim().to_string();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut check = FieldCheck::new();
        check
            .text("name", &self.name)
            .text("category", &self.category)
            .text("fileName", &self.file_name)
            .text("uploadedBy", &self.uploaded_by);
        check_file_name(&mut check, &self.file_name);
        check.finish()
    }

    fn refresh_derived(&mut self) {
        self.extension = file_extension(&self.file_name);
        self.doc_type = document_type_for(&self.extension);
    }

    fn project_ref(&self) -> Option<EntityId> {
        self.project_id
    }

    fn detach(&mut self, kind: EntityKind, id: EntityId) -> bool {
        if kind == EntityKind::Project && self.project_id == Some(id) {
            self.project_id = None;
            return true;
        }
        false
    }

    fn collection(collections: &Collections) -> &Vec<Self> {
        &collections.documents
    }

    fn collection_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.documents
    }
}

fn check_file_name(check: &mut FieldCheck, file_name: &str) {
    let trimmed = file_name.trim();
    if !trimmed.is_empty() && file_stem(trimmed).is_empty() {
        check.reject(
            "fileName",
            format!("`{trimmed}` has no name before the extension"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentDraft, DocumentPatch, DocumentType};
    use crate::model::Entity;
    use chrono::Utc;

    fn draft(file_name: &str) -> DocumentDraft {
        DocumentDraft {
            name: "Site plan".to_string(),
            category: "Blueprints".to_string(),
            project_id: Some(2),
            file_name: file_name.to_string(),
            size_bytes: 2_516_582,
            uploaded_by: "J. Doe".to_string(),
        }
    }

    #[test]
    fn type_and_size_are_derived_from_upload() {
        let document = Document::from_draft(1, draft("plan-rev3.PDF"), Utc::now()).unwrap();
        assert_eq!(document.extension, "pdf");
        assert_eq!(document.doc_type, DocumentType::Pdf);
        assert_eq!(document.size, "2.4 MB");
    }

    #[test]
    fn renaming_the_file_rederives_type() {
        let mut document = Document::from_draft(1, draft("plan.pdf"), Utc::now()).unwrap();
        document.apply_patch(DocumentPatch {
            file_name: Some("budget.xlsx".to_string()),
            ..DocumentPatch::default()
        });
        document.refresh_derived();
        assert_eq!(document.extension, "xlsx");
        assert_eq!(document.doc_type, DocumentType::Excel);
    }

    #[test]
    fn replacement_upload_updates_size() {
        let mut document = Document::from_draft(1, draft("plan.pdf"), Utc::now()).unwrap();
        document.apply_patch(DocumentPatch {
            file_name: Some("plan-rev4.pdf".to_string()),
            size_bytes: Some(3_500),
            ..DocumentPatch::default()
        });
        assert_eq!(document.size, "3.4 KB");
        assert_eq!(document.file_name, "plan-rev4.pdf");
    }

    #[test]
    fn dotfile_without_name_is_invalid() {
        let err = Document::from_draft(1, draft(".pdf"), Utc::now()).unwrap_err();
        assert!(err.is_invalid("fileName"));
    }

    #[test]
    fn type_serializes_under_type_key() {
        let document = Document::from_draft(1, draft("photo.jpg"), Utc::now()).unwrap();
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["type"], "images");
        assert_eq!(json["uploadedBy"], "J. Doe");
    }
}
