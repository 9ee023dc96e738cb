//! Errors returned by the logging primitives

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for writer construction and logger lifecycle
#[derive(Debug, Error)]
pub enum LogError {
    /// A writer was requested with settings it cannot honour
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The log file could not be opened or created
    #[error("unable to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),
}
