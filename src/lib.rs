//! # activity-elt
//!
//! Synthetic user-activity logs for a cloud ELT pipeline.
//!
//! The crate generates newline-delimited JSON activity events, checks them
//! against the schema the downstream catalog expects, and hands the finished
//! file to object storage. Cataloging, transformation and querying are done
//! by managed services and are not part of this crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use activity_elt::generator::LogGenerator;
//!
//! fn main() -> activity_elt::Result<()> {
//!     let report = LogGenerator::new().generate_to_path(1000, "user_activity_logs.json")?;
//!     println!("wrote {} events", report.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Line format
//!
//! ```text
//! {"event_id": "<uuid4>", "user_id": 42, "action": "view", "timestamp": "2024-01-15T10:30:00.123456", "metadata": {"device": "mobile", "location": "EU"}}
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   NDJSON   ┌──────────────┐   blob   ┌──────────────────┐
//! │  generator   │ ─────────▶ │  local file  │ ───────▶ │ output (upload)  │
//! │ RandomSource │            └──────┬───────┘          │ S3/R2/GCS/Azure  │
//! │ Clock        │                   │                  └──────────────────┘
//! └──────────────┘                   ▼
//!                             ┌──────────────┐
//!                             │    schema    │  strict validation,
//!                             │              │  crawler-style inference
//!                             └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Event record and shared types
pub mod types;

/// Generator configuration
pub mod config;

/// Activity event generation
pub mod generator;

/// Event schema, validation and inference
pub mod schema;

/// Object storage upload
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use generator::{generate, generate_to_path, LogGenerator};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
