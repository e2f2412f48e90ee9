//! Strict schema for one activity event

use super::types::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{Action, Device, Location, TimestampStyle, USER_ID_MAX, USER_ID_MIN};
use std::collections::BTreeMap;

/// Build the closed schema every generated line must satisfy
///
/// All keys are required and no others are allowed, at both levels.
/// `style` picks the one timestamp form the file may use: `naive-date-time`
/// (no zone designator) or `date-time` (trailing `Z`), both with exactly
/// six fractional digits.
pub fn activity_event_schema(style: TimestampStyle) -> JsonSchema {
    let (timestamp_format, timestamp_description) = match style {
        TimestampStyle::Naive => (
            "naive-date-time",
            "UTC generation instant, ISO-8601 without zone designator",
        ),
        TimestampStyle::Utc => (
            "date-time",
            "UTC generation instant, RFC 3339 with trailing Z",
        ),
    };

    let mut metadata = BTreeMap::new();
    metadata.insert(
        "device".to_string(),
        SchemaProperty::string_enum(Device::ALL.map(Device::as_str)),
    );
    metadata.insert(
        "location".to_string(),
        SchemaProperty::string_enum(Location::ALL.map(Location::as_str)),
    );

    let mut schema = JsonSchema::new().with_title("ActivityEvent");
    schema.additional_properties = false;

    schema.add_property(
        "event_id",
        SchemaProperty::new(JsonType::String).with_format("uuid"),
    );
    schema.add_property(
        "user_id",
        SchemaProperty::new(JsonType::Integer)
            .with_range(i64::from(USER_ID_MIN), i64::from(USER_ID_MAX)),
    );
    schema.add_property(
        "action",
        SchemaProperty::string_enum(Action::ALL.map(Action::as_str)),
    );
    schema.add_property(
        "timestamp",
        SchemaProperty::new(JsonType::String)
            .with_format(timestamp_format)
            .with_description(timestamp_description),
    );
    schema.add_property("metadata", SchemaProperty::strict_object(metadata));

    for key in ["event_id", "user_id", "action", "timestamp", "metadata"] {
        schema.add_required(key);
    }

    schema
}
