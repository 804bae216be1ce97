//! Runtime settings for one dashboard data directory.
//!
//! # Responsibility
//! - Resolve the database file and log directory from a data directory.
//! - Reject relative paths before anything touches the filesystem.
//!
//! # Invariants
//! - Every path returned by a validated `CoreConfig` is absolute.

use crate::logging::{default_log_level, init_logging};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "sitecraft.sqlite3";
const LOG_DIR_NAME: &str = "logs";
const EXPORT_DIR_NAME: &str = "exports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativePath { field: &'static str, path: PathBuf },
    EmptyFileName,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativePath { field, path } => {
                write!(f, "{field} must be an absolute path, got `{}`", path.display())
            }
            Self::EmptyFileName => f.write_str("db_file_name cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_level: String,
    /// Defaults to `<data_dir>/logs` when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Defaults rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_absolute("data_dir", &self.data_dir)?;
        if let Some(log_dir) = &self.log_dir {
            require_absolute("log_dir", log_dir)?;
        }
        if self.db_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(self.db_file_name.trim())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_DIR_NAME))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(EXPORT_DIR_NAME)
    }

    /// Validates and starts file logging with these settings.
    pub fn init_logging(&self) -> Result<(), String> {
        self.validate().map_err(|err| err.to_string())?;
        init_logging(&self.log_level, &self.log_dir())
    }
}

fn require_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            field,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn paths_derive_from_data_dir() {
        let root = std::env::temp_dir().join("sitecraft-config");
        let config = CoreConfig::new(&root);
        assert!(config.validate().is_ok());
        assert_eq!(config.db_path(), root.join("sitecraft.sqlite3"));
        assert_eq!(config.log_dir(), root.join("logs"));
        assert_eq!(config.export_dir(), root.join("exports"));
    }

    #[test]
    fn relative_paths_are_rejected() {
        let err = CoreConfig::new("data/site").validate().unwrap_err();
        assert!(matches!(err, ConfigError::RelativePath { field: "data_dir", .. }));

        let err = CoreConfig::new(std::env::temp_dir())
            .with_log_dir(PathBuf::from("logs"))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("log_dir"));
    }
}
