use crate::codes::ErrorCode;
use crate::retry::RetryClass;
use serde::Serialize;

/// Canonical error carried across crate boundaries. The user message is safe
/// to surface to callers (and carries the validator diagnostic they debug
/// with); the dev message is for logs only.
#[derive(Clone, Debug)]
pub struct ErrorObj {
    pub code: ErrorCode,
    pub message_user: String,
    pub message_dev: Option<String>,
}

impl ErrorObj {
    pub fn retry_class(&self) -> RetryClass {
        self.code.retry
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status
    }

    pub fn to_public(&self) -> PublicErrorView {
        PublicErrorView {
            code: self.code.code,
            message: self.message_user.clone(),
            http_status: self.code.http_status,
        }
    }
}

impl std::fmt::Display for ErrorObj {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.code, self.message_user)?;
        if let Some(dev) = &self.message_dev {
            write!(f, " ({dev})")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PublicErrorView {
    pub code: &'static str,
    pub message: String,
    #[serde(skip)]
    pub http_status: u16,
}

pub struct ErrorBuilder {
    code: ErrorCode,
    message_user: Option<String>,
    message_dev: Option<String>,
}

impl ErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message_user: None,
            message_dev: None,
        }
    }

    pub fn user_msg(mut self, msg: impl Into<String>) -> Self {
        self.message_user = Some(msg.into());
        self
    }

    pub fn dev_msg(mut self, msg: impl Into<String>) -> Self {
        self.message_dev = Some(msg.into());
        self
    }

    pub fn build(self) -> ErrorObj {
        ErrorObj {
            message_user: self
                .message_user
                .unwrap_or_else(|| "Internal error.".to_string()),
            message_dev: self.message_dev,
            code: self.code,
        }
    }
}
