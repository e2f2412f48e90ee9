//! Integration tests
//!
//! Tests the full local flow: generate → file on disk → strict validation →
//! upload to a local object store.

use activity_elt::generator::{FixedClock, LogGenerator, RngSource};
use activity_elt::output::CloudDestination;
use activity_elt::schema::{activity_event_schema, validate_file, SchemaInferrer, SchemaValidator};
use activity_elt::{ActivityEvent, Action, Error, TimestampStyle};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

// ============================================================================
// Generation → Validation
// ============================================================================

#[test]
fn test_generated_file_passes_strict_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_activity_logs.json");

    let report = activity_elt::generate_to_path(1000, &path).unwrap();
    assert_eq!(report.records, 1000);

    let validation = validate_file(&path, TimestampStyle::Naive).unwrap();
    assert!(validation.is_ok(), "{validation:?}");
    assert_eq!(validation.total, 1000);
    assert_eq!(validation.valid, 1000);
    assert_eq!(validation.duplicate_event_ids, 0);
}

#[test]
fn test_every_line_matches_json_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");
    LogGenerator::seeded(77)
        .generate_to_path(300, &path)
        .unwrap();

    let validator = SchemaValidator::new(&activity_event_schema(TimestampStyle::Naive));
    for line in read_lines(&path) {
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(validator.validate(&value), vec![], "line: {line}");
    }
}

#[test]
fn test_lines_deserialize_into_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");
    activity_elt::generate_to_path(50, &path).unwrap();

    let events: Vec<ActivityEvent> = read_lines(&path)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 50);

    let ids: HashSet<_> = events.iter().map(|e| e.event_id).collect();
    assert_eq!(ids.len(), 50);

    for event in &events {
        NaiveDateTime::parse_from_str(&event.timestamp, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
    }
}

#[test]
fn test_crawler_infers_one_uniform_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");
    LogGenerator::seeded(8).generate_to_path(200, &path).unwrap();

    let records: Vec<Value> = read_lines(&path)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let schema = SchemaInferrer::new().infer_from_records(&records);

    assert_eq!(schema.required.len(), 5);
    let metadata = schema.get_property("metadata").unwrap();
    assert!(metadata
        .properties
        .as_ref()
        .unwrap()
        .values()
        .all(|p| !p.is_nullable()));
}

#[test]
fn test_fixed_clock_and_seed_reproduce_file() {
    let instant = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_micro_opt(0, 0, 0, 1)
        .unwrap()
        .and_utc();

    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");

    LogGenerator::with_parts(RngSource::seeded(5), FixedClock(instant))
        .generate_to_path(100, &a)
        .unwrap();
    LogGenerator::with_parts(RngSource::seeded(5), FixedClock(instant))
        .generate_to_path(100, &b)
        .unwrap();

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_logout_events_present_for_downstream_filter() {
    // The managed transform drops logout events, so the raw data must contain them
    let mut generator = LogGenerator::seeded(21);
    let logouts = (0..400)
        .map(|_| generator.next_event())
        .filter(|e| e.action == Action::Logout)
        .count();
    assert!(logouts > 0);
    assert!(logouts < 400);
}

#[test]
fn test_utc_style_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utc.json");
    LogGenerator::seeded(4)
        .with_timestamp_style(TimestampStyle::Utc)
        .generate_to_path(20, &path)
        .unwrap();

    for line in read_lines(&path) {
        let value: Value = serde_json::from_str(&line).unwrap();
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
    assert!(validate_file(&path, TimestampStyle::Utc).unwrap().is_ok());

    let as_naive = validate_file(&path, TimestampStyle::Naive).unwrap();
    assert_eq!(as_naive.invalid, 20);
    assert!(!as_naive.is_ok());
}

// ============================================================================
// Failure Scenarios
// ============================================================================

#[test]
fn test_zero_count_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");

    let err = activity_elt::generate_to_path(0, &path).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { count: 0 }));
    assert!(!path.exists());
}

#[test]
fn test_tampered_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs.json");
    LogGenerator::seeded(6).generate_to_path(10, &path).unwrap();

    let content = fs::read_to_string(&path)
        .unwrap()
        .replacen("\"action\": \"", "\"action\": \"x", 1);
    fs::write(&path, content).unwrap();

    let report = validate_file(&path, TimestampStyle::Naive).unwrap();
    assert!(!report.is_ok());
    assert_eq!(report.invalid, 1);
    assert_eq!(report.violations[0].line, Some(1));
    assert_eq!(report.violations[0].path, "$.action");
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_to_local_destination() {
    let source = tempfile::tempdir().unwrap();
    let path = source.path().join("user_activity_logs.json");
    activity_elt::generate_to_path(100, &path).unwrap();

    let bucket = tempfile::tempdir().unwrap();
    let prefix = bucket.path().join("raw");
    let dest = CloudDestination::parse(prefix.to_str().unwrap()).unwrap();
    assert!(!dest.is_cloud());

    let url = dest.upload_file(&path, false).await.unwrap();
    assert!(url.ends_with("/user_activity_logs.json"));

    let uploaded = prefix.join("user_activity_logs.json");
    assert_eq!(fs::read(&uploaded).unwrap(), fs::read(&path).unwrap());
    assert!(validate_file(&uploaded, TimestampStyle::Naive).unwrap().is_ok());
}
