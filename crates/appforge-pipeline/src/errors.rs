use appforge_errors::prelude::*;
use appforge_llm::errors::LlmError;
use appforge_schema::errors::SchemaError;
use appforge_storage::errors::StorageError;
use thiserror::Error;

/// Terminal error of one pipeline operation. Retries happen below this
/// boundary (in the gateway); nothing here is retried.
#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct PipelineError(pub Box<ErrorObj>);

impl PipelineError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn is_not_found(&self) -> bool {
        self.0.code == codes::STORAGE_NOT_FOUND
    }

    pub fn code(&self) -> &'static str {
        self.0.code.code
    }

    pub fn application_not_found() -> Self {
        PipelineError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Application not found")
                .build(),
        ))
    }

    pub fn input_invalid(detail: &str) -> Self {
        PipelineError(Box::new(
            ErrorBuilder::new(codes::VALIDATION_INPUT)
                .user_msg(format!("Input validation failed: {detail}"))
                .build(),
        ))
    }

    pub fn output_invalid(detail: &str) -> Self {
        PipelineError(Box::new(
            ErrorBuilder::new(codes::VALIDATION_OUTPUT)
                .user_msg(format!("Output validation failed: {detail}"))
                .build(),
        ))
    }

    /// Wraps a failed model call, keeping the underlying code so a timeout
    /// still maps to 504 while provider faults stay 502.
    pub fn llm_call(err: LlmError) -> Self {
        let inner = err.into_inner();
        let mut builder = ErrorBuilder::new(inner.code)
            .user_msg(format!("LLM call failed: {}", inner.message_user));
        if let Some(dev) = inner.message_dev {
            builder = builder.dev_msg(dev);
        }
        PipelineError(Box::new(builder.build()))
    }

    pub fn internal(detail: &str) -> Self {
        PipelineError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Internal error.")
                .dev_msg(detail)
                .build(),
        ))
    }
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        PipelineError(Box::new(err.into_inner()))
    }
}

impl From<SchemaError> for PipelineError {
    fn from(err: SchemaError) -> Self {
        PipelineError(Box::new(err.into_inner()))
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        PipelineError::llm_call(err)
    }
}
