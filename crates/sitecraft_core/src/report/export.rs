//! Export file naming, encoding and writing.

use super::{AttendanceReport, ReportDocument};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// MIME type of every export; matches the slot payload format.
pub const EXPORT_MIME_TYPE: &str = "application/json";

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug)]
pub enum ReportError {
    Serialize(serde_json::Error),
    Io(std::io::Error),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to encode report: {err}"),
            Self::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<std::io::Error> for ReportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Encoded export ready to be downloaded or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    /// `sitecraft-report-{type}-{YYYY-MM-DD}.json`, dated by `generated_at`.
    pub fn from_report(report: &ReportDocument) -> ReportResult<Self> {
        let file_name = format!(
            "sitecraft-report-{}-{}.json",
            file_name_safe(report.kind.as_str()),
            report.generated_at.date_naive().format("%Y-%m-%d")
        );
        Self::encode(file_name, report)
    }

    /// `attendance-report-{date}.json`.
    pub fn from_attendance(report: &AttendanceReport) -> ReportResult<Self> {
        let file_name = format!("attendance-report-{}.json", report.date.format("%Y-%m-%d"));
        Self::encode(file_name, report)
    }

    fn encode<T: serde::Serialize>(file_name: String, value: &T) -> ReportResult<Self> {
        let contents = serde_json::to_string_pretty(value)?;
        Ok(Self {
            file_name,
            mime_type: EXPORT_MIME_TYPE,
            contents,
        })
    }

    /// Writes the export into `dir`, creating it when missing.
    ///
    /// Returns the full path of the written file.
    pub fn write_to_dir(&self, dir: &Path) -> ReportResult<PathBuf> {
        let path = dir.join(&self.file_name);
        let result = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, &self.contents));
        match result {
            Ok(()) => {
                info!(
                    "event=report_export module=report status=ok file={} bytes={}",
                    self.file_name,
                    self.contents.len()
                );
                Ok(path)
            }
            Err(err) => {
                error!(
                    "event=report_export module=report status=error file={} error={err}",
                    self.file_name
                );
                Err(err.into())
            }
        }
    }
}

/// Keeps verbatim kind labels usable as a file name segment.
fn file_name_safe(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "report".to_string()
    } else {
        cleaned
    }
}
