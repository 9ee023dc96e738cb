//! Log severity levels
//!
//! Levels are ordered from most to least verbose. Selecting a level enables it
//! and every level after it, so `Info` enables `Info`, `Warn` and `Error`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LogError;

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Every level, most verbose first
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Prefix written at the start of every line of this level
    pub fn marker(&self) -> &'static str {
        match self {
            Level::Trace => "T: ",
            Level::Debug => "D: ",
            Level::Info => "I: ",
            Level::Warn => "W: ",
            Level::Error => "E: ",
        }
    }

    /// Position in [`Level::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub(crate) fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Whether `candidate` produces output when `selected` is the threshold
pub fn is_enabled(selected: Level, candidate: Level) -> bool {
    candidate >= selected
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" | "t" => Ok(Level::Trace),
            "debug" | "d" => Ok(Level::Debug),
            "info" | "i" => Ok(Level::Info),
            "warn" | "warning" | "w" => Ok(Level::Warn),
            "error" | "e" => Ok(Level::Error),
            _ => Err(LogError::UnknownLevel(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_from_info() {
        assert!(!is_enabled(Level::Info, Level::Trace));
        assert!(!is_enabled(Level::Info, Level::Debug));
        assert!(is_enabled(Level::Info, Level::Info));
        assert!(is_enabled(Level::Info, Level::Warn));
        assert!(is_enabled(Level::Info, Level::Error));
    }

    #[test]
    fn test_trace_enables_everything() {
        for level in Level::ALL {
            assert!(is_enabled(Level::Trace, level));
        }
    }

    #[test]
    fn test_error_enables_only_error() {
        let enabled: Vec<Level> = Level::ALL
            .into_iter()
            .filter(|l| is_enabled(Level::Error, *l))
            .collect();
        assert_eq!(enabled, vec![Level::Error]);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!(" e ".parse::<Level>().unwrap(), Level::Error);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LogError::UnknownLevel(s)) if s == "verbose"
        ));
    }

    #[test]
    fn test_index_round_trips() {
        for level in Level::ALL {
            assert_eq!(Level::from_index(level.index() as u8), Some(level));
        }
        assert_eq!(Level::from_index(5), None);
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn test_markers() {
        assert_eq!(Level::Trace.marker(), "T: ");
        assert_eq!(Level::Error.marker(), "E: ");
    }
}
