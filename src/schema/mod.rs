//! Schema module
//!
//! Local stand-ins for the checks the downstream catalog relies on.
//!
//! # Features
//!
//! - **Strict Schema**: JSON schema for one activity event, enums and ranges included
//! - **Validation**: Reports every violation of a schema in a JSON value
//! - **Type Inference**: Infers schemas from records the way a crawler does
//! - **File Checks**: Validates a whole generated file line by line

mod activity;
mod inference;
mod types;
mod validator;

pub use activity::activity_event_schema;
pub use inference::{infer_schema, merge_schemas, SchemaInferrer};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
pub use validator::{validate_file, SchemaValidator, ValidationReport, Violation};
