//! Wall clock abstraction

use crate::types::TimestampStyle;
use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current instant
pub trait Clock {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Render an instant in the requested style, always with microseconds
pub fn render_timestamp(instant: DateTime<Utc>, style: TimestampStyle) -> String {
    match style {
        TimestampStyle::Naive => instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        TimestampStyle::Utc => instant.to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}
