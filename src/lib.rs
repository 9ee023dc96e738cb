//! rotlog - leveled logging with a size-rotated log file
//!
//! This library provides the rotating file writer, the leveled logger built
//! on top of it, and the configuration that drives both.

pub mod config;
pub mod logging;

pub use config::LoggerConfig;
pub use logging::{Level, LeveledLogger, LogError, RotatingFileWriter};
