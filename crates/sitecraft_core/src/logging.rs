//! Rolling file logs for the dashboard core.
//!
//! # Responsibility
//! - Start the `sitecraft` file logger at most once per process.
//! - Record panics as sanitized one-line events.
//!
//! # Invariants
//! - Repeating init with identical settings is a no-op.
//! - Switching level or directory after init is refused.
//! - Init reports failures as `Err` and never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "sitecraft";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_FILES: usize = 5;
const PANIC_TEXT_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    dir: PathBuf,
}

impl LogSettings {
    fn parse(level: &str, dir: &Path) -> Result<Self, String> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            other => {
                return Err(format!(
                    "unsupported log level `{other}`; expected trace|debug|info|warn|error"
                ))
            }
        };
        if dir.as_os_str().is_empty() {
            return Err("log_dir cannot be empty".to_string());
        }
        if !dir.is_absolute() {
            return Err(format!(
                "log_dir must be an absolute path, got `{}`",
                dir.display()
            ));
        }
        Ok(Self {
            level,
            dir: dir.to_path_buf(),
        })
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unknown level, or an empty/relative/uncreatable directory.
/// - Logging already active with a different level or directory.
/// - Backend start failure.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let wanted = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(&wanted))?;

    if active.settings.dir != wanted.dir {
        return Err(format!(
            "logging already active in `{}`; refusing to switch to `{}`",
            active.settings.dir.display(),
            wanted.dir.display()
        ));
    }
    if active.settings.level != wanted.level {
        return Err(format!(
            "logging already active at level `{}`; refusing to switch to `{}`",
            active.settings.level, wanted.level
        ));
    }
    Ok(())
}

fn start(settings: &LogSettings) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&settings.dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            settings.dir.display()
        )
    })?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", settings.level))?
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log_panic(info);
        previous(info);
    }));

    info!(
        "event=logging_start module=core status=ok level={} log_dir={} debug_build={} version={}",
        settings.level,
        settings.dir.display(),
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION")
    );
    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

/// `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.settings.level, active.settings.dir.clone()))
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let location = info
        .location()
        .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(
        "event=panic module=core status=error location={location} payload={}",
        one_line(&payload, PANIC_TEXT_LIMIT)
    );
}

/// Flattens line breaks and caps `text` at `limit` characters.
fn one_line(text: &str, limit: usize) -> String {
    let flat = text.replace(['\n', '\r'], " ");
    match flat.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, LogSettings};
    use std::path::Path;

    #[test]
    fn level_names_are_normalized() {
        let dir = std::env::temp_dir();
        assert_eq!(LogSettings::parse("DEBUG", &dir).unwrap().level, "debug");
        assert_eq!(LogSettings::parse(" warning ", &dir).unwrap().level, "warn");
        assert!(LogSettings::parse("verbose", &dir).is_err());
    }

    #[test]
    fn relative_or_empty_log_dir_is_refused() {
        let error = LogSettings::parse("info", Path::new("site/logs")).unwrap_err();
        assert!(error.contains("absolute"));
        assert!(LogSettings::parse("info", Path::new("")).is_err());
    }

    #[test]
    fn panic_text_is_flattened_and_capped() {
        assert_eq!(one_line("crane\nfailure\rat gate", 10), "crane fail...");
        assert_eq!(one_line("short", 10), "short");
    }

    // Only test in this binary that starts the global logger.
    #[test]
    fn repeated_init_is_idempotent_and_conflicts_are_refused() {
        let root = tempfile::tempdir().unwrap();
        let logs = root.path().join("logs");
        let other = root.path().join("other-logs");

        init_logging("info", &logs).unwrap();
        init_logging("INFO", &logs).unwrap();

        let level_error = init_logging("debug", &logs).unwrap_err();
        assert!(level_error.contains("refusing to switch"));
        let dir_error = init_logging("info", &other).unwrap_err();
        assert!(dir_error.contains("refusing to switch"));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, logs);
    }
}
