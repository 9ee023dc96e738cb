//! Logging system for rotlog
//!
//! Provides a size-rotated log file with numbered backups, per-level
//! console/file destinations, a process-wide default logger and a bridge for
//! `tracing` events.

mod bridge;
mod error;
mod format;
pub mod global;
mod level;
mod logger;
mod rotating;
mod sink;

pub use bridge::{init_tracing, tracing_layer, LoggerMakeWriter, MarkerFormat};
pub use error::LogError;
pub use format::LineFormat;
pub use level::{is_enabled, Level};
pub use logger::LeveledLogger;
pub use rotating::{
    RotatingFileWriter, RotationEvent, RotationObserver, SharedFileWriter, DEFAULT_BACKUP_COUNT,
    DEFAULT_MAX_BYTES,
};
pub use sink::{Console, Destination, DestinationWriter, MemorySink, Sink};
