//! Route `tracing` events into a [`LeveledLogger`]
//!
//! Each event is written to the destination of its level, so tracing output
//! follows the same console/file split and threshold as direct log calls.
//! Events are rendered in the logger's own line shape:
//! `I: 2026/01/21 14:30:45 main.rs:42: target: message`.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::format::LineFormat;
use super::level::Level;
use super::logger::LeveledLogger;
use super::sink::{Destination, DestinationWriter};

/// Writer factory for tracing-subscriber
#[derive(Debug, Clone)]
pub struct LoggerMakeWriter {
    logger: Arc<LeveledLogger>,
}

impl LoggerMakeWriter {
    pub fn new(logger: Arc<LeveledLogger>) -> Self {
        Self { logger }
    }

    fn writer_for(&self, level: Level) -> DestinationWriter {
        if self.logger.is_enabled(level) {
            self.logger.destination(level).writer()
        } else {
            Destination::discard().writer()
        }
    }
}

impl<'a> MakeWriter<'a> for LoggerMakeWriter {
    type Writer = DestinationWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer_for(Level::Info)
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        self.writer_for(Level::from(*meta.level()))
    }
}

/// Formats tracing events with the level marker first
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFormat {
    format: LineFormat,
}

impl MarkerFormat {
    pub fn new(format: LineFormat) -> Self {
        Self { format }
    }
}

impl<S, N> FormatEvent<S, N> for MarkerFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let location = meta.file().zip(meta.line());

        self.format.write_prefix(
            &mut writer,
            Local::now(),
            Level::from(*meta.level()),
            location,
        )?;
        write!(writer, "{}: ", meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build the fmt layer used by [`init_tracing`]
pub fn tracing_layer<S>(logger: Arc<LeveledLogger>) -> impl tracing_subscriber::Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let format = MarkerFormat::new(logger.line_format());
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(format)
        .with_writer(LoggerMakeWriter::new(logger))
}

/// Install a global tracing subscriber that writes through `logger`
///
/// `RUST_LOG` wins when set; otherwise the logger's threshold is the filter.
pub fn init_tracing(logger: Arc<LeveledLogger>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger.threshold().filter_directive()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_layer(logger))
        .try_init()
        .context("Failed to install tracing subscriber")
}
