//! Schema validation for values and generated files

use super::activity::activity_event_schema;
use super::inference::SchemaInferrer;
use super::types::{JsonSchema, JsonType, SchemaProperty};
use crate::error::{Error, Result};
use crate::types::TimestampStyle;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Upper bound on violations kept in a file report
const MAX_REPORTED_VIOLATIONS: usize = 100;

/// Zone-less timestamp with microsecond precision
static NAIVE_MICROS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}$").expect("valid regex")
});

/// UTC timestamp with microsecond precision and a trailing `Z`
static UTC_MICROS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}Z$").expect("valid regex")
});

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// 1-based line number, when validating a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// JSON path of the offending value, e.g. `$.metadata.device`
    pub path: String,
    /// What is wrong
    pub message: String,
}

impl Violation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            line: None,
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}: {}", self.path, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

/// Validates JSON values against a `JsonSchema`
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    root: SchemaProperty,
}

impl SchemaValidator {
    /// Create a validator for `schema`
    pub fn new(schema: &JsonSchema) -> Self {
        Self {
            root: schema.as_property(),
        }
    }

    /// Collect every violation in `value`; empty means valid
    pub fn validate(&self, value: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_property(&self.root, value, "$", &mut violations);
        violations
    }

    /// Check whether `value` is valid
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_empty()
    }
}

fn check_property(prop: &SchemaProperty, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let actual = JsonType::of(value);
    if !prop.json_type.accepts(actual) {
        out.push(Violation::new(
            path,
            format!("expected {}, found {actual}", prop.json_type),
        ));
        return;
    }

    if let Some(allowed) = &prop.enum_values {
        if !allowed.contains(value) {
            let allowed = serde_json::to_string(allowed).unwrap_or_default();
            out.push(Violation::new(path, format!("{value} is not one of {allowed}")));
        }
    }

    if prop.minimum.is_some() || prop.maximum.is_some() {
        check_range(prop, value, path, out);
    }

    match value {
        Value::String(s) => {
            if let Some(format) = &prop.format {
                if !matches_format(format, s) {
                    out.push(Violation::new(path, format!("'{s}' is not a valid {format}")));
                }
            }
        }
        Value::Object(map) => {
            for key in &prop.required {
                if !map.contains_key(key) {
                    out.push(Violation::new(path, format!("missing required field '{key}'")));
                }
            }
            for (key, child) in map {
                let child_path = format!("{path}.{key}");
                match prop.properties.as_ref().and_then(|p| p.get(key)) {
                    Some(child_prop) => check_property(child_prop, child, &child_path, out),
                    None if prop.additional_properties == Some(false) => {
                        out.push(Violation::new(&child_path, "unexpected field"));
                    }
                    None => {}
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_prop) = &prop.items {
                for (i, item) in items.iter().enumerate() {
                    check_property(item_prop, item, &format!("{path}[{i}]"), out);
                }
            }
        }
        _ => {}
    }
}

fn check_range(prop: &SchemaProperty, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let in_range = match value.as_i64() {
        Some(n) => {
            prop.minimum.map_or(true, |min| n >= min) && prop.maximum.map_or(true, |max| n <= max)
        }
        // Floats and integers beyond i64 are compared as f64
        None => value.as_f64().is_some_and(|n| {
            prop.minimum.map_or(true, |min| n >= min as f64)
                && prop.maximum.map_or(true, |max| n <= max as f64)
        }),
    };

    if !in_range {
        let min = prop.minimum.map_or_else(|| "-inf".to_string(), |m| m.to_string());
        let max = prop.maximum.map_or_else(|| "inf".to_string(), |m| m.to_string());
        out.push(Violation::new(path, format!("{value} is outside [{min}, {max}]")));
    }
}

fn matches_format(format: &str, s: &str) -> bool {
    match format {
        "uuid" => uuid::Uuid::parse_str(s).is_ok_and(|id| id.hyphenated().to_string() == s),
        // Both timestamp forms carry exactly six fractional digits
        "naive-date-time" => {
            NAIVE_MICROS.is_match(s)
                && NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        }
        "date-time" => UTC_MICROS.is_match(s) && DateTime::parse_from_rfc3339(s).is_ok(),
        "date" => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        // Unknown formats are annotations only
        _ => true,
    }
}

// ============================================================================
// File validation
// ============================================================================

/// Outcome of validating a generated activity file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Lines in the file
    pub total: usize,
    /// Lines that parsed and satisfied the schema
    pub valid: usize,
    /// Lines that did not
    pub invalid: usize,
    /// event_id values seen more than once
    pub duplicate_event_ids: usize,
    /// Every record infers to the same schema
    pub consistent: bool,
    /// Every line ends with a bare `\n` and none is blank
    pub well_terminated: bool,
    /// First violations found (capped)
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// All checks passed
    pub fn is_ok(&self) -> bool {
        self.total > 0
            && self.invalid == 0
            && self.duplicate_event_ids == 0
            && self.consistent
            && self.well_terminated
    }

    /// One entry per failed check, for error messages
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        if self.total == 0 {
            failures.push("file has no records".to_string());
        }
        if self.invalid > 0 {
            failures.push(format!("{} of {} lines invalid", self.invalid, self.total));
        }
        if self.duplicate_event_ids > 0 {
            failures.push(format!("{} duplicate event_id values", self.duplicate_event_ids));
        }
        if !self.consistent {
            failures.push("record shapes differ".to_string());
        }
        if !self.well_terminated {
            failures.push("lines are not terminated by a single \\n".to_string());
        }
        failures
    }

    fn record(&mut self, violation: Violation) {
        if self.violations.len() < MAX_REPORTED_VIOLATIONS {
            self.violations.push(violation);
        }
    }
}

/// Validate every line of an NDJSON activity file
pub fn validate_file(path: impl AsRef<Path>, style: TimestampStyle) -> Result<ValidationReport> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })?;

    let report = validate_str(&content, style);
    debug!(
        path = %path.display(),
        total = report.total,
        invalid = report.invalid,
        "Validated activity file"
    );
    Ok(report)
}

/// Validate NDJSON content already in memory
pub(crate) fn validate_str(content: &str, style: TimestampStyle) -> ValidationReport {
    let validator = SchemaValidator::new(&activity_event_schema(style));
    let inferrer = SchemaInferrer::new();

    let mut report = ValidationReport {
        consistent: true,
        well_terminated: content.ends_with('\n'),
        ..ValidationReport::default()
    };
    let mut seen_ids = HashSet::new();
    let mut reference_shape: Option<JsonSchema> = None;

    for (index, raw) in content.split_terminator('\n').enumerate() {
        let line_no = index + 1;
        report.total += 1;

        let line = match raw.strip_suffix('\r') {
            Some(stripped) => {
                report.well_terminated = false;
                report.record(Violation {
                    line: Some(line_no),
                    ..Violation::new("$", "line ends with \\r; lines must end with a bare \\n")
                });
                stripped
            }
            None => raw,
        };

        if line.trim().is_empty() {
            report.well_terminated = false;
            report.invalid += 1;
            report.record(Violation {
                line: Some(line_no),
                ..Violation::new("$", "blank line")
            });
            continue;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                report.invalid += 1;
                report.record(Violation {
                    line: Some(line_no),
                    ..Violation::new("$", format!("invalid JSON: {e}"))
                });
                continue;
            }
        };

        let violations = validator.validate(&value);
        if violations.is_empty() {
            report.valid += 1;
        } else {
            report.invalid += 1;
            for violation in violations {
                report.record(Violation {
                    line: Some(line_no),
                    ..violation
                });
            }
        }

        if let Some(id) = value.get("event_id").and_then(Value::as_str) {
            if !seen_ids.insert(id.to_string()) {
                report.duplicate_event_ids += 1;
            }
        }

        let shape = inferrer.infer(&value);
        match &reference_shape {
            Some(reference) if *reference != shape => {
                if report.consistent {
                    report.record(Violation {
                        line: Some(line_no),
                        ..Violation::new("$", "key set or field types differ from the first record")
                    });
                }
                report.consistent = false;
            }
            Some(_) => {}
            None => reference_shape = Some(shape),
        }
    }

    report
}
