//! Output sinks and per-level destinations
//!
//! A [`Destination`] is what a level writes to: nothing, a single sink, or a
//! fan-out that duplicates every write across several sinks.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use super::rotating::SharedFileWriter;

/// In-memory capture buffer, usable in place of a console stream
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes
            .lock()
            .map(|b| b.is_empty())
            .unwrap_or(true)
    }

    fn append(&self, buf: &[u8]) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
    }
}

/// A single place log bytes can go
#[derive(Clone)]
pub enum Sink {
    Stdout,
    Stderr,
    File(SharedFileWriter),
    Memory(MemorySink),
}

impl Sink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::File(file) => file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(buf),
            Sink::Memory(memory) => {
                memory.append(buf);
                Ok(())
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::File(file) => file.lock().unwrap_or_else(PoisonError::into_inner).flush(),
            Sink::Memory(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::File(_) => f.write_str("File"),
            Sink::Memory(_) => f.write_str("Memory"),
        }
    }
}

/// Console streams used by the logger
///
/// Defaults to the real stdout and stderr. Tests swap in memory sinks.
#[derive(Debug, Clone)]
pub struct Console {
    /// Stream for TRACE, DEBUG, INFO and WARN
    pub out: Sink,
    /// Stream for ERROR
    pub err: Sink,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            out: Sink::Stdout,
            err: Sink::Stderr,
        }
    }
}

impl Console {
    /// Console backed by two memory sinks
    pub fn memory(out: &MemorySink, err: &MemorySink) -> Self {
        Self {
            out: Sink::Memory(out.clone()),
            err: Sink::Memory(err.clone()),
        }
    }
}

/// Where one level's lines are written
#[derive(Debug, Clone, Default)]
pub struct Destination {
    sinks: Vec<Sink>,
}

impl Destination {
    /// Destination that drops everything
    pub fn discard() -> Self {
        Self::default()
    }

    pub fn single(sink: Sink) -> Self {
        Self { sinks: vec![sink] }
    }

    /// Destination that duplicates every write to each of `sinks`
    pub fn fan_out(sinks: Vec<Sink>) -> Self {
        Self { sinks }
    }

    pub fn is_discard(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    /// Write `buf` to every sink
    ///
    /// Every sink is tried even when an earlier one fails; the first error is
    /// returned.
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write_all(buf) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn flush(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// An `io::Write` handle for this destination
    pub fn writer(&self) -> DestinationWriter {
        DestinationWriter {
            destination: self.clone(),
        }
    }
}

/// Owned `io::Write` adapter over a [`Destination`]
#[derive(Debug, Clone)]
pub struct DestinationWriter {
    destination: Destination,
}

impl Write for DestinationWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.destination.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.destination.flush()
    }
}
