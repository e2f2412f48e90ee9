//! Schema inference from JSON values

use super::types::{JsonSchema, JsonType, SchemaProperty};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// Nesting level below which objects are not inspected further
const MAX_DEPTH: usize = 10;

static DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}").expect("valid regex"));

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

/// Schema inferrer with configuration options
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    /// Detect date-time formats
    detect_datetime: bool,
    /// Detect UUID formats
    detect_uuid: bool,
    /// Record count for required detection
    record_count: usize,
    /// Field occurrence count for required detection
    field_counts: BTreeMap<String, usize>,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default settings
    pub fn new() -> Self {
        Self {
            detect_datetime: true,
            detect_uuid: true,
            record_count: 0,
            field_counts: BTreeMap::new(),
        }
    }

    /// Enable/disable datetime detection
    #[must_use]
    pub fn with_datetime_detection(mut self, enabled: bool) -> Self {
        self.detect_datetime = enabled;
        self
    }

    /// Enable/disable UUID detection
    #[must_use]
    pub fn with_uuid_detection(mut self, enabled: bool) -> Self {
        self.detect_uuid = enabled;
        self
    }

    /// Infer schema from a single JSON value
    pub fn infer(&self, value: &Value) -> JsonSchema {
        let mut schema = JsonSchema::new();

        if let Value::Object(map) = value {
            for (key, val) in map {
                let property = self.infer_property(val, 0);
                schema.add_property(key, property);
                // Single record - all fields are required
                schema.add_required(key);
            }
        }

        schema
    }

    /// Infer schema from multiple JSON values (records)
    pub fn infer_from_records(&mut self, records: &[Value]) -> JsonSchema {
        self.record_count = 0;
        self.field_counts.clear();

        let Some(first) = records.first() else {
            return JsonSchema::new();
        };

        // Start with schema from first record
        let mut schema = self.infer(first);
        self.record_count = 1;

        if let Value::Object(map) = first {
            for key in map.keys() {
                self.field_counts.insert(key.clone(), 1);
            }
        }

        for record in records.iter().skip(1) {
            self.record_count += 1;
            self.merge_record_into_schema(&mut schema, record);
        }

        self.update_required(&mut schema);

        schema
    }

    /// Merge a record into an existing schema
    fn merge_record_into_schema(&mut self, schema: &mut JsonSchema, record: &Value) {
        let Value::Object(map) = record else {
            return;
        };
        for key in map.keys() {
            *self.field_counts.entry(key.clone()).or_insert(0) += 1;
        }

        let fields: BTreeMap<_, _> = map
            .iter()
            .map(|(key, val)| (key.clone(), self.infer_property(val, 0)))
            .collect();
        merge_fields(&mut schema.properties, &fields);
    }

    /// Update required fields based on field occurrence counts
    fn update_required(&self, schema: &mut JsonSchema) {
        schema.required.clear();
        for (key, count) in &self.field_counts {
            if *count == self.record_count {
                if let Some(prop) = schema.get_property(key) {
                    if !prop.is_nullable() {
                        schema.add_required(key);
                    }
                }
            }
        }
    }

    /// Infer a property from a JSON value
    fn infer_property(&self, value: &Value, depth: usize) -> SchemaProperty {
        if depth >= MAX_DEPTH {
            return SchemaProperty::new(JsonType::Object);
        }

        match value {
            Value::Null => SchemaProperty::nullable(JsonType::Null),
            Value::String(s) => self.infer_string_property(s),
            Value::Array(arr) => self.infer_array_property(arr, depth),
            Value::Object(map) => self.infer_object_property(map, depth),
            other => SchemaProperty::new(JsonType::of(other)),
        }
    }

    /// Infer property type from a string value
    fn infer_string_property(&self, s: &str) -> SchemaProperty {
        let mut prop = SchemaProperty::new(JsonType::String);

        if self.detect_datetime && DATETIME.is_match(s) {
            prop.format = Some("date-time".to_string());
        } else if self.detect_datetime && DATE.is_match(s) {
            prop.format = Some("date".to_string());
        } else if self.detect_uuid && UUID.is_match(s) {
            prop.format = Some("uuid".to_string());
        }

        prop
    }

    /// Infer property type from an array value
    fn infer_array_property(&self, arr: &[Value], depth: usize) -> SchemaProperty {
        let Some(first) = arr.first() else {
            // Empty array - unknown item type
            return SchemaProperty::array(SchemaProperty::new(JsonType::Object));
        };

        let mut item_schema = self.infer_property(first, depth + 1);
        for item in arr.iter().skip(1) {
            let item_prop = self.infer_property(item, depth + 1);
            item_schema = merge_property(&item_schema, &item_prop);
        }

        SchemaProperty::array(item_schema)
    }

    /// Infer property type from an object value
    fn infer_object_property(
        &self,
        map: &serde_json::Map<String, Value>,
        depth: usize,
    ) -> SchemaProperty {
        let properties = map
            .iter()
            .map(|(key, val)| (key.clone(), self.infer_property(val, depth + 1)))
            .collect();

        SchemaProperty::object(properties)
    }
}

/// Infer schema from a single JSON value (convenience function)
pub fn infer_schema(value: &Value) -> JsonSchema {
    SchemaInferrer::new().infer(value)
}

/// Merge two schemas; fields present in only one become nullable
pub fn merge_schemas(a: &JsonSchema, b: &JsonSchema) -> JsonSchema {
    let mut merged = a.clone();
    merge_fields(&mut merged.properties, &b.properties);
    merged.required.retain(|key| b.is_required(key));
    merged
}

/// Fold `other` into `fields`, nulling out keys either side lacks
fn merge_fields(
    fields: &mut BTreeMap<String, SchemaProperty>,
    other: &BTreeMap<String, SchemaProperty>,
) {
    for (key, prop) in fields.iter_mut() {
        match other.get(key) {
            Some(theirs) => *prop = merge_property(prop, theirs),
            None => prop.make_nullable(),
        }
    }
    for (key, theirs) in other {
        fields.entry(key.clone()).or_insert_with(|| {
            let mut prop = theirs.clone();
            prop.make_nullable();
            prop
        });
    }
}

fn merge_property(a: &SchemaProperty, b: &SchemaProperty) -> SchemaProperty {
    // Conflicting formats cancel out
    let format = match (&a.format, &b.format) {
        (Some(af), Some(bf)) if af != bf => None,
        (af, bf) => af.clone().or_else(|| bf.clone()),
    };

    let properties = match (&a.properties, &b.properties) {
        (Some(ours), Some(theirs)) => {
            let mut merged = ours.clone();
            merge_fields(&mut merged, theirs);
            Some(merged)
        }
        (ours, theirs) => ours.clone().or_else(|| theirs.clone()),
    };

    let items = match (&a.items, &b.items) {
        (Some(ours), Some(theirs)) => Some(Box::new(merge_property(ours, theirs))),
        (ours, theirs) => ours.clone().or_else(|| theirs.clone()),
    };

    // Inferred properties carry no enum or range constraints
    SchemaProperty {
        json_type: a.json_type.merge_with(&b.json_type),
        description: a.description.clone().or_else(|| b.description.clone()),
        format,
        properties,
        items,
        additional_properties: a.additional_properties.or(b.additional_properties),
        ..SchemaProperty::new(JsonType::Object)
    }
}
