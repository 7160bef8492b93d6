use appforge_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct LlmError(pub Box<ErrorObj>);

impl LlmError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn message(&self) -> &str {
        &self.0.message_user
    }

    pub fn retry_class(&self) -> RetryClass {
        self.0.retry_class()
    }

    pub fn provider_unavailable(msg: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg(format!("LLM provider request failed: {msg}"))
                .build(),
        ))
    }

    pub fn timeout(msg: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::LLM_TIMEOUT)
                .user_msg(format!("LLM request timed out: {msg}"))
                .build(),
        ))
    }

    pub fn schema(msg: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(format!("LLM request was malformed: {msg}"))
                .build(),
        ))
    }

    pub fn unknown(msg: &str) -> Self {
        LlmError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg(format!("LLM call failed: {msg}"))
                .build(),
        ))
    }
}
