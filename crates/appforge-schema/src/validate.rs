use crate::errors::SchemaError;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// Draft-7 structural validator. Stateless: applications are immutable once
/// created, so schemas are compiled per call rather than cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    fn compile(schema: &Value) -> Result<JSONSchema, SchemaError> {
        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|err| SchemaError::malformed_schema(&err.to_string()))
    }

    /// Checks that the document is itself a well-formed Draft-7 schema.
    /// Called once per schema at application creation; either input or
    /// output schema failing rejects the whole creation.
    pub fn check_schema_well_formed(&self, schema: &Value) -> Result<(), SchemaError> {
        Self::compile(schema).map(|_| ())
    }

    /// Validates a JSON value against a schema. The diagnostic names the
    /// instance path and the failing constraint so callers can debug
    /// malformed payloads.
    pub fn validate_instance(&self, value: &Value, schema: &Value) -> Result<(), SchemaError> {
        let compiled = Self::compile(schema)?;
        compiled.validate(value).map_err(|mut errors| {
            let detail = match errors.next() {
                Some(err) => format!(
                    "{} (instance path '{}', schema path '{}')",
                    err, err.instance_path, err.schema_path
                ),
                None => "instance does not conform to schema".to_string(),
            };
            SchemaError::instance_mismatch(&detail)
        })
    }
}
