//! Event sampling and NDJSON writing

use super::clock::{render_timestamp, Clock, SystemClock};
use super::format::to_line;
use super::source::{pick, RandomSource, RngSource};
use crate::error::{Error, Result};
use crate::types::{
    Action, ActivityEvent, Device, EventMetadata, Location, TimestampStyle, USER_ID_MAX,
    USER_ID_MIN,
};
use rand::rngs::StdRng;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Summary of a completed generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Lines written
    pub records: usize,
    /// Bytes written, terminators included
    pub bytes: u64,
}

/// Activity log generator
pub struct LogGenerator<S, C = SystemClock> {
    source: S,
    clock: C,
    style: TimestampStyle,
}

impl LogGenerator<RngSource<StdRng>, SystemClock> {
    /// Generator with OS-seeded randomness and the system clock
    pub fn new() -> Self {
        Self::with_parts(RngSource::from_entropy(), SystemClock)
    }

    /// Generator with seeded randomness and the system clock
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(RngSource::seeded(seed), SystemClock)
    }
}

impl Default for LogGenerator<RngSource<StdRng>, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource, C: Clock> LogGenerator<S, C> {
    /// Generator over an explicit random source and clock
    pub fn with_parts(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            style: TimestampStyle::default(),
        }
    }

    /// Set the timestamp rendering style
    #[must_use]
    pub fn with_timestamp_style(mut self, style: TimestampStyle) -> Self {
        self.style = style;
        self
    }

    /// Sample a single event
    pub fn next_event(&mut self) -> ActivityEvent {
        let action = pick(&mut self.source, &Action::ALL);
        let device = pick(&mut self.source, &Device::ALL);
        let location = pick(&mut self.source, &Location::ALL);
        let user_id = self.source.integer(USER_ID_MIN..=USER_ID_MAX);
        let event_id = self.source.uuid();
        let timestamp = render_timestamp(self.clock.now(), self.style);

        ActivityEvent {
            event_id,
            user_id,
            action,
            timestamp,
            metadata: EventMetadata { device, location },
        }
    }

    /// Write `count` events to `sink`, one JSON object per line
    ///
    /// A zero count is rejected before anything touches the sink. Each line
    /// is serialized in full before it is handed to the sink.
    pub fn generate<W: Write + ?Sized>(
        &mut self,
        count: usize,
        sink: &mut W,
    ) -> Result<GenerationReport> {
        if count == 0 {
            return Err(Error::InvalidCount { count });
        }

        let mut bytes = 0u64;
        for written in 0..count {
            let event = self.next_event();
            let line = to_line(&event)
                .map_err(|e| Error::output(format!("Failed to serialize event: {e}")))?;
            sink.write_all(&line).map_err(|e| Error::sink(written, e))?;
            bytes += line.len() as u64;
        }
        sink.flush().map_err(|e| Error::sink(count, e))?;

        debug!(records = count, bytes, "Generated activity events");
        Ok(GenerationReport {
            records: count,
            bytes,
        })
    }

    /// Create (or truncate) `path` and generate `count` events into it
    ///
    /// The file is not created when `count` is zero.
    pub fn generate_to_path(
        &mut self,
        count: usize,
        path: impl AsRef<Path>,
    ) -> Result<GenerationReport> {
        let path = path.as_ref();
        if count == 0 {
            return Err(Error::InvalidCount { count });
        }

        let file = File::create(path).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", path.display()))
        })?;
        let report = self.generate_buffered(count, file)?;

        info!(
            path = %path.display(),
            records = report.records,
            bytes = report.bytes,
            "Wrote activity log"
        );
        Ok(report)
    }

    /// Generate through a `BufWriter` over `inner`
    ///
    /// On a sink failure `records_written` counts the lines that reached
    /// `inner` in full, not the lines still sitting in the buffer.
    pub(super) fn generate_buffered<W: Write>(
        &mut self,
        count: usize,
        inner: W,
    ) -> Result<GenerationReport> {
        let mut writer = BufWriter::new(LineTally::new(inner));
        let result = self.generate(count, &mut writer);
        // into_parts skips the flush-on-drop, so the tally stays exact
        let (tally, _unflushed) = writer.into_parts();
        result.map_err(|e| match e {
            Error::Sink { source, .. } => Error::sink(tally.lines, source),
            other => other,
        })
    }
}

/// Counts the `\n` terminators the inner writer accepted
struct LineTally<W> {
    inner: W,
    lines: usize,
}

impl<W> LineTally<W> {
    fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }
}

impl<W: Write> Write for LineTally<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.lines += buf[..n].iter().filter(|&&b| b == b'\n').count();
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Write `count` freshly sampled events to `sink`
pub fn generate<W: Write + ?Sized>(count: usize, sink: &mut W) -> Result<GenerationReport> {
    LogGenerator::new().generate(count, sink)
}

/// Write `count` freshly sampled events to a new file at `path`
pub fn generate_to_path(count: usize, path: impl AsRef<Path>) -> Result<GenerationReport> {
    LogGenerator::new().generate_to_path(count, path)
}
