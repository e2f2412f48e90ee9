//! Log generator module
//!
//! Produces synthetic activity events and writes them as newline-delimited
//! JSON.
//!
//! # Overview
//!
//! This module provides:
//! - `RandomSource` - Pluggable source of uniform choices, integers and UUIDs
//! - `Clock` - Pluggable wall clock
//! - `LogGenerator` - Samples events and writes one JSON line per event
//! - `SpacedFormatter` - JSON formatter matching the documented line layout

mod clock;
mod format;
mod source;
mod writer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use format::{to_line, SpacedFormatter};
pub use source::{pick, RandomSource, RngSource};
pub use writer::{generate, generate_to_path, GenerationReport, LogGenerator};
