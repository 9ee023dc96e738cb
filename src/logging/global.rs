//! Process-wide default logger
//!
//! Holds at most one running [`LeveledLogger`]. Before [`start`] and after
//! [`stop`] every log call is a no-op. Prefer passing a logger around
//! explicitly; this holder exists for the `info!`-style macros.

use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use super::error::LogError;
use super::level::Level;
use super::logger::LeveledLogger;
use super::rotating::{DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES};
use crate::config::LoggerConfig;

static CURRENT: RwLock<Option<Arc<LeveledLogger>>> = RwLock::new(None);

/// Start logging at `level`, to `path` as well when given, with the default
/// rotation settings
///
/// Exits the process if the log file cannot be opened.
pub fn start(level: Level, path: Option<&Path>) -> Arc<LeveledLogger> {
    start_ex(level, path, DEFAULT_MAX_BYTES, DEFAULT_BACKUP_COUNT)
}

/// Like [`start`] with explicit rotation settings
pub fn start_ex(
    level: Level,
    path: Option<&Path>,
    max_bytes: u64,
    backup_count: usize,
) -> Arc<LeveledLogger> {
    let config = LoggerConfig {
        level,
        file: path.map(Path::to_path_buf),
        max_bytes,
        backup_count,
        ..LoggerConfig::default()
    };
    start_with(&config)
}

/// Start logging with `config`
///
/// A log file that cannot be opened terminates the process with exit status 1.
pub fn start_with(config: &LoggerConfig) -> Arc<LeveledLogger> {
    match try_start_with(config) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("logger: unable to create rotating file writer: {}", err);
            std::process::exit(1);
        }
    }
}

/// Start logging with `config`, returning construction errors
///
/// A logger that is already running is replaced but not stopped; its file is
/// released once the last handle to it is dropped.
pub fn try_start_with(config: &LoggerConfig) -> Result<Arc<LeveledLogger>, LogError> {
    let logger = Arc::new(LeveledLogger::start(config)?);
    install(Arc::clone(&logger));
    Ok(logger)
}

/// Make `logger` the process-wide logger
pub fn install(logger: Arc<LeveledLogger>) {
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = Some(logger);
}

/// Stop the process-wide logger and close its file
pub fn stop() -> Result<(), LogError> {
    let logger = CURRENT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    match logger {
        Some(logger) => logger.stop(),
        None => Ok(()),
    }
}

/// Flush the log file to stable storage
pub fn sync() {
    if let Some(logger) = current() {
        logger.sync();
    }
}

/// The running logger, if any
pub fn current() -> Option<Arc<LeveledLogger>> {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Write one line at `level`. Used by the logging macros.
#[track_caller]
pub fn emit(level: Level, message: fmt::Arguments<'_>) {
    let location = Location::caller();
    if let Some(logger) = current() {
        logger.emit_at(level, location, message);
    }
}

/// Write `err` at ERROR level
#[track_caller]
pub fn error(err: impl fmt::Display) {
    emit(Level::Error, format_args!("{}", err));
}

/// Write `err` at ERROR level when present
#[track_caller]
pub fn if_error<E: fmt::Display>(err: Option<E>) {
    if let Some(err) = err {
        emit(Level::Error, format_args!("{}", err));
    }
}

/// Log at TRACE level through the process-wide logger
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::logging::global::emit($crate::logging::Level::Trace, format_args!($($arg)+))
    };
}

/// Log at DEBUG level through the process-wide logger
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::logging::global::emit($crate::logging::Level::Debug, format_args!($($arg)+))
    };
}

/// Log at INFO level through the process-wide logger
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::logging::global::emit($crate::logging::Level::Info, format_args!($($arg)+))
    };
}

/// Log at WARN level through the process-wide logger
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::logging::global::emit($crate::logging::Level::Warn, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The holder is process-wide, so the whole lifecycle runs in one test.
    #[test]
    fn test_global_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("global.log");

        // Stopped: calls are no-ops.
        assert!(current().is_none());
        crate::info!("before start");
        if_error(Some("ignored"));
        sync();
        assert!(stop().is_ok());

        let logger = start_ex(Level::Info, Some(path.as_path()), 1024, 2);
        assert_eq!(logger.threshold(), Level::Info);
        assert!(current().is_some());

        crate::debug!("not written");
        crate::info!("written {}", 1);
        crate::warning!("written {}", 2);
        error("written 3");
        if_error(None::<String>);
        sync();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("before start"));
        assert!(!contents.contains("not written"));
        assert!(contents.contains("I: ") && contents.contains("written 1"));
        assert!(contents.contains("W: ") && contents.contains("written 2"));
        assert!(contents.contains("E: ") && contents.contains("written 3"));
        assert!(contents.contains("global.rs:"));

        // Restart replaces the running logger.
        let replacement = try_start_with(&LoggerConfig::console(Level::Error)).unwrap();
        assert!(Arc::ptr_eq(&current().unwrap(), &replacement));
        assert!(logger.file_writer().unwrap().lock().unwrap().is_open());

        assert!(stop().is_ok());
        assert!(current().is_none());
        crate::trace!("after stop");
    }

    #[test]
    fn test_try_start_reports_errors() {
        let config = LoggerConfig {
            file: Some("ignored.log".into()),
            max_bytes: 0,
            ..LoggerConfig::default()
        };
        assert!(matches!(
            try_start_with(&config),
            Err(LogError::InvalidConfiguration(_))
        ));
    }
}
