use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use rotlog::config::LoggerConfig;
use rotlog::logging::{self, global};

/// Copies stdin into the configured log destinations at INFO level.
///
/// Usage: `rotlog [CONFIG]`. Without an argument `~/.rotlog/config.toml` is
/// used when present.
fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => LoggerConfig::load_from(&PathBuf::from(path))?,
        None => LoggerConfig::load()?,
    };

    // Exits the process if the log file cannot be opened
    let logger = global::start_with(&config);
    logging::init_tracing(Arc::clone(&logger))?;

    tracing::debug!(
        level = %config.level,
        file = ?config.file_path(),
        max_bytes = config.max_bytes,
        backup_count = config.backup_count,
        "Logger started"
    );

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => rotlog::info!("{}", line),
            Err(err) => {
                global::error(&err);
                break;
            }
        }
    }

    global::sync();
    tracing::debug!("Logger stopping");
    global::stop()?;
    Ok(())
}
