use appforge_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct SchemaError(pub Box<ErrorObj>);

impl SchemaError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn message(&self) -> &str {
        &self.0.message_user
    }

    pub fn malformed_schema(detail: &str) -> Self {
        SchemaError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(format!("Schema validation error: {detail}"))
                .build(),
        ))
    }

    pub fn instance_mismatch(detail: &str) -> Self {
        SchemaError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(detail)
                .build(),
        ))
    }
}
