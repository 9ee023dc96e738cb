//! Line formatting
//!
//! Lines look like `I: 2026/01/21 14:30:45 main.rs:42: message`.

use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::level::Level;

/// Which fields are written between the level marker and the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFormat {
    /// Local date, `2026/01/21`
    pub date: bool,
    /// Local time, `14:30:45`
    pub time: bool,
    /// Append microseconds to the time (`14:30:45.123456`)
    pub microseconds: bool,
    /// Caller file name and line, `main.rs:42`
    pub location: bool,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            date: true,
            time: true,
            microseconds: false,
            location: true,
        }
    }
}

impl LineFormat {
    /// Format a line stamped with the current local time
    pub fn format(
        &self,
        level: Level,
        location: &Location<'_>,
        message: fmt::Arguments<'_>,
    ) -> String {
        self.format_at(Local::now(), level, location, message)
    }

    /// Format a line stamped with `now`
    pub fn format_at(
        &self,
        now: DateTime<Local>,
        level: Level,
        location: &Location<'_>,
        message: fmt::Arguments<'_>,
    ) -> String {
        let mut line = String::with_capacity(64);
        let _ = self.write_prefix(
            &mut line,
            now,
            level,
            Some((location.file(), location.line())),
        );

        let _ = line.write_fmt(message);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }

    /// Write the marker, timestamp and location that precede a message
    ///
    /// `location` is skipped when absent, even if enabled.
    pub fn write_prefix(
        &self,
        out: &mut impl fmt::Write,
        now: DateTime<Local>,
        level: Level,
        location: Option<(&str, u32)>,
    ) -> fmt::Result {
        out.write_str(level.marker())?;

        if self.date {
            write!(out, "{} ", now.format("%Y/%m/%d"))?;
        }
        if self.time {
            if self.microseconds {
                write!(out, "{} ", now.format("%H:%M:%S%.6f"))?;
            } else {
                write!(out, "{} ", now.format("%H:%M:%S"))?;
            }
        }
        if self.location {
            if let Some((file, line)) = location {
                write!(out, "{}:{}: ", short_file(file), line)?;
            }
        }
        Ok(())
    }
}

/// Final path component of a source file
fn short_file(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 21, 14, 30, 45).unwrap()
    }

    #[test]
    fn test_full_line() {
        let location = Location::caller();
        let line = LineFormat::default().format_at(
            fixed_time(),
            Level::Info,
            location,
            format_args!("hello {}", "world"),
        );

        assert_eq!(
            line,
            format!("I: 2026/01/21 14:30:45 format.rs:{}: hello world\n", location.line())
        );
    }

    #[test]
    fn test_bare_line() {
        let format = LineFormat {
            date: false,
            time: false,
            microseconds: false,
            location: false,
        };
        let line = format.format_at(
            fixed_time(),
            Level::Warn,
            Location::caller(),
            format_args!("disk almost full"),
        );
        assert_eq!(line, "W: disk almost full\n");
    }

    #[test]
    fn test_existing_newline_is_not_doubled() {
        let format = LineFormat {
            location: false,
            ..LineFormat::default()
        };
        let line = format.format_at(
            fixed_time(),
            Level::Error,
            Location::caller(),
            format_args!("boom\n"),
        );
        assert_eq!(line, "E: 2026/01/21 14:30:45 boom\n");
    }

    #[test]
    fn test_microseconds() {
        let format = LineFormat {
            date: false,
            microseconds: true,
            location: false,
            ..LineFormat::default()
        };
        let line = format.format_at(
            fixed_time(),
            Level::Debug,
            Location::caller(),
            format_args!("tick"),
        );
        assert_eq!(line, "D: 14:30:45.000000 tick\n");
    }

    #[test]
    fn test_prefix_without_location() {
        let mut prefix = String::new();
        LineFormat::default()
            .write_prefix(&mut prefix, fixed_time(), Level::Info, None)
            .unwrap();
        assert_eq!(prefix, "I: 2026/01/21 14:30:45 ");
    }

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("src/logging/format.rs"), "format.rs");
        assert_eq!(short_file("main.rs"), "main.rs");
    }
}
