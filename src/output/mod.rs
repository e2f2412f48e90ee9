//! Output module
//!
//! Hands finished activity files to object storage.
//!
//! # Overview
//!
//! This module provides:
//! - Destination URL parsing (S3, R2, GCS, Azure, local directory)
//! - Hive-style date partitioning of object keys
//! - Whole-file upload of a generated NDJSON file

mod cloud;

pub use cloud::{build_partitioned_path, CloudDestination};
