use crate::retry::RetryClass;

/// A stable error code with its transport mapping. Codes are part of the
/// public contract; never rename one once shipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorCode {
    pub code: &'static str,
    pub http_status: u16,
    pub retry: RetryClass,
}

pub const SCHEMA_VALIDATION: ErrorCode = ErrorCode {
    code: "schema.validation",
    http_status: 400,
    retry: RetryClass::Permanent,
};

pub const VALIDATION_INPUT: ErrorCode = ErrorCode {
    code: "validation.input",
    http_status: 400,
    retry: RetryClass::Permanent,
};

pub const VALIDATION_OUTPUT: ErrorCode = ErrorCode {
    code: "validation.output",
    http_status: 400,
    retry: RetryClass::Permanent,
};

pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode {
    code: "storage.not_found",
    http_status: 404,
    retry: RetryClass::None,
};

pub const STORAGE_CONFLICT: ErrorCode = ErrorCode {
    code: "storage.conflict",
    http_status: 409,
    retry: RetryClass::None,
};

pub const STORAGE_UNAVAILABLE: ErrorCode = ErrorCode {
    code: "storage.unavailable",
    http_status: 500,
    retry: RetryClass::Transient,
};

pub const PROVIDER_UNAVAILABLE: ErrorCode = ErrorCode {
    code: "llm.provider_unavailable",
    http_status: 502,
    retry: RetryClass::Transient,
};

pub const LLM_TIMEOUT: ErrorCode = ErrorCode {
    code: "llm.timeout",
    http_status: 504,
    retry: RetryClass::Transient,
};

pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode {
    code: "unknown.internal",
    http_status: 500,
    retry: RetryClass::None,
};
