//! File name and size helpers for document records.

use crate::model::document::DocumentType;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Lowercase extension of `file_name` without the dot, or `""` when absent.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .trim()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Part of `file_name` before the last dot.
pub fn file_stem(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
}

/// File family for an extension as produced by `file_extension`.
pub fn document_type_for(extension: &str) -> DocumentType {
    match extension {
        "pdf" => DocumentType::Pdf,
        "xls" | "xlsx" | "xlsm" | "csv" | "ods" => DocumentType::Excel,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" | "heic" => DocumentType::Images,
        _ => DocumentType::Document,
    }
}

/// Formats a byte count with one decimal in binary units (`"2.4 MB"`).
pub fn human_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < MIB {
        format!("{:.1} KB", value / KIB)
    } else if value < GIB {
        format!("{:.1} MB", value / MIB)
    } else {
        format!("{:.1} GB", value / GIB)
    }
}
