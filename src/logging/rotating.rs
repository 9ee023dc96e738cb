//! Size-rotated log file with numbered backups
//!
//! The live file sits at `path`; rotated copies are kept as `path.1` (newest)
//! through `path.N` (oldest). Rotation is checked at the start of every write.
//!
//! The writer has no internal locking. Share it behind a mutex (see
//! [`SharedFileWriter`]) or drive it from a single thread.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::LogError;

/// Default size at which the live file is rotated (10 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated backups kept next to the live file
pub const DEFAULT_BACKUP_COUNT: usize = 10;

/// A rotating writer shared between several destinations
pub type SharedFileWriter = Arc<Mutex<RotatingFileWriter>>;

/// Callback receiving rotation diagnostics
pub type RotationObserver = Box<dyn Fn(&RotationEvent) + Send + Sync>;

/// Something the rotation step did or chose to ignore
#[derive(Debug)]
pub enum RotationEvent {
    /// The live file was moved to `path.1` and a fresh file opened
    Rotated { path: PathBuf },
    /// The live file could not be inspected; the write went ahead unrotated
    StatFailed { error: io::Error },
    /// A backup shift failed and was skipped
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        error: io::Error,
    },
    /// The fresh file could not be opened; the writer has no handle now
    ReopenFailed { error: io::Error },
    /// Rotation was due but `backup_count` is 0, so the file keeps growing
    RetentionDisabled { size: u64 },
}

/// Append-only log file that rotates once it reaches `max_bytes`
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: Option<File>,
    observer: Option<RotationObserver>,
}

impl RotatingFileWriter {
    /// Open (or create) the log file at `path`
    ///
    /// The parent directory is created first when missing. Failing to create
    /// it is not an error by itself; the open that follows reports the real
    /// problem.
    pub fn open(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
    ) -> Result<Self, LogError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = create_parent_dir(parent);
        }

        if max_bytes == 0 {
            return Err(LogError::InvalidConfiguration(
                "max bytes must be greater than zero".to_string(),
            ));
        }

        let file = open_append(&path).map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file: Some(file),
            observer: None,
        })
    }

    /// Attach a callback that is told about rotations and ignored failures
    pub fn with_observer(mut self, observer: RotationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Wrap the writer for sharing between destinations
    pub fn into_shared(self) -> SharedFileWriter {
        Arc::new(Mutex::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    /// Whether a file handle is currently held
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the `index`-th backup (`path.index`)
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Ask the OS to flush the file to stable storage
    ///
    /// Best effort: errors are ignored.
    pub fn sync(&self) {
        if let Some(file) = &self.file {
            let _ = file.sync_all();
        }
    }

    /// Release the file handle. Calling it again is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }

    fn notify(&self, event: RotationEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Whether appending `incoming` bytes should first rotate the file
    fn rotation_due(&self, incoming: usize) -> bool {
        let Some(file) = &self.file else {
            return false;
        };

        let size = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(error) => {
                // Never block a write on a failed stat.
                self.notify(RotationEvent::StatFailed { error });
                return false;
            }
        };

        size > 0 && size.saturating_add(incoming as u64) >= self.max_bytes
    }

    fn rotate_if_due(&mut self, incoming: usize) {
        if !self.rotation_due(incoming) {
            return;
        }

        if self.backup_count == 0 {
            // Nothing is renamed or truncated; the live file keeps growing.
            let size = self
                .file
                .as_ref()
                .and_then(|f| f.metadata().ok())
                .map_or(0, |m| m.len());
            self.notify(RotationEvent::RetentionDisabled { size });
            return;
        }

        self.rotate();
    }

    fn rotate(&mut self) {
        drop(self.file.take());

        // Each shift is attempted independently. A failed rename leaves a
        // stale or missing backup behind but never stops the rotation.
        for i in (1..self.backup_count).rev() {
            let from = self.backup_path(i);
            let to = self.backup_path(i + 1);
            self.rename_ignoring_failure(from, to);
        }
        self.rename_ignoring_failure(self.path.clone(), self.backup_path(1));

        match open_append(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.notify(RotationEvent::Rotated {
                    path: self.path.clone(),
                });
            }
            Err(error) => self.notify(RotationEvent::ReopenFailed { error }),
        }
    }

    fn rename_ignoring_failure(&self, from: PathBuf, to: PathBuf) {
        match fs::rename(&from, &to) {
            Ok(()) => {}
            // Gaps in the backup chain are expected.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(error) => self.notify(RotationEvent::RenameFailed { from, to, error }),
        }
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.rotate_if_due(buf.len());
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(not_open(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backup_count", &self.backup_count)
            .field("open", &self.file.is_some())
            .finish()
    }
}

fn not_open(path: &Path) -> io::Error {
    io::Error::other(format!("log file {} is not open", path.display()))
}

#[cfg(unix)]
fn open_append(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o666)
        .open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(unix)]
fn create_parent_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
}

#[cfg(not(unix))]
fn create_parent_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
