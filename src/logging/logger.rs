//! Leveled logger routing formatted lines to per-level destinations

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::PoisonError;

use super::error::LogError;
use super::format::LineFormat;
use super::level::{is_enabled, Level};
use super::rotating::{RotatingFileWriter, SharedFileWriter};
use super::sink::{Console, Destination, Sink};
use crate::config::LoggerConfig;

/// A running logger
///
/// Each level owns a [`Destination`]. Levels below the threshold discard
/// their output; enabled levels write to their console stream and, when a
/// log file is configured, to the shared [`RotatingFileWriter`] as well.
///
/// Log calls never fail: write errors are dropped here.
#[derive(Debug)]
pub struct LeveledLogger {
    threshold: AtomicU8,
    destinations: [Destination; 5],
    file: Option<SharedFileWriter>,
    format: LineFormat,
}

impl LeveledLogger {
    /// Start a logger writing to the process stdout/stderr
    pub fn start(config: &LoggerConfig) -> Result<Self, LogError> {
        Self::start_with_console(config, Console::default())
    }

    /// Start a logger writing to the given console streams
    pub fn start_with_console(config: &LoggerConfig, console: Console) -> Result<Self, LogError> {
        let file = match config.file_path() {
            Some(path) => Some(
                RotatingFileWriter::open(path, config.max_bytes, config.backup_count)?
                    .into_shared(),
            ),
            None => None,
        };

        let destinations =
            Level::ALL.map(|level| build_destination(config.level, level, &console, file.as_ref()));

        Ok(Self {
            threshold: AtomicU8::new(config.level.index() as u8),
            destinations,
            file,
            format: config.format,
        })
    }

    /// Close the log file, if any. Console output keeps working.
    pub fn stop(&self) -> Result<(), LogError> {
        if let Some(file) = &self.file {
            file.lock().unwrap_or_else(PoisonError::into_inner).close()?;
        }
        Ok(())
    }

    /// Flush the log file to stable storage, if any
    pub fn sync(&self) {
        if let Some(file) = &self.file {
            file.lock().unwrap_or_else(PoisonError::into_inner).sync();
        }
    }

    pub fn threshold(&self) -> Level {
        Level::from_index(self.threshold.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// Change the threshold without rebuilding destinations
    ///
    /// Destinations are fixed at start, so raising the threshold silences
    /// levels below it, while lowering it cannot enable levels that started
    /// out disabled. Safe to call while other threads are logging.
    pub fn set_threshold(&self, level: Level) {
        self.threshold.store(level.index() as u8, Ordering::Relaxed);
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        is_enabled(self.threshold(), level)
    }

    pub fn destination(&self, level: Level) -> &Destination {
        &self.destinations[level.index()]
    }

    /// The shared log file writer, when file output is configured
    pub fn file_writer(&self) -> Option<&SharedFileWriter> {
        self.file.as_ref()
    }

    pub fn line_format(&self) -> LineFormat {
        self.format
    }

    /// Format and write one line at `level`
    #[track_caller]
    pub fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        self.emit_at(level, Location::caller(), message);
    }

    pub(crate) fn emit_at(&self, level: Level, location: &Location<'_>, message: fmt::Arguments<'_>) {
        let destination = self.destination(level);
        if destination.is_discard() || !self.is_enabled(level) {
            return;
        }

        let line = self.format.format(level, location, message);
        let _ = destination.write_all(line.as_bytes());
    }

    #[track_caller]
    pub fn trace(&self, message: fmt::Arguments<'_>) {
        self.emit_at(Level::Trace, Location::caller(), message);
    }

    #[track_caller]
    pub fn debug(&self, message: fmt::Arguments<'_>) {
        self.emit_at(Level::Debug, Location::caller(), message);
    }

    #[track_caller]
    pub fn info(&self, message: fmt::Arguments<'_>) {
        self.emit_at(Level::Info, Location::caller(), message);
    }

    #[track_caller]
    pub fn warning(&self, message: fmt::Arguments<'_>) {
        self.emit_at(Level::Warn, Location::caller(), message);
    }

    /// Write `err` to the ERROR destination
    #[track_caller]
    pub fn error(&self, err: impl fmt::Display) {
        self.emit_at(Level::Error, Location::caller(), format_args!("{}", err));
    }

    /// Write `err` to the ERROR destination when there is one
    #[track_caller]
    pub fn if_error<E: fmt::Display>(&self, err: Option<E>) {
        if let Some(err) = err {
            self.emit_at(Level::Error, Location::caller(), format_args!("{}", err));
        }
    }
}

fn build_destination(
    threshold: Level,
    level: Level,
    console: &Console,
    file: Option<&SharedFileWriter>,
) -> Destination {
    if !is_enabled(threshold, level) {
        return Destination::discard();
    }

    let stream = match level {
        Level::Error => console.err.clone(),
        _ => console.out.clone(),
    };

    match file {
        Some(file) => Destination::fan_out(vec![Sink::File(file.clone()), stream]),
        None => Destination::single(stream),
    }
}
