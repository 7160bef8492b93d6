use serde::{Deserialize, Serialize};

/// Whether an error is worth retrying. Carried on the error code so retry
/// loops can decide without matching on individual codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryClass {
    /// Not retryable and not a fault either (missing record, conflict).
    None,
    /// A later attempt may succeed (provider 5xx, timeout, store outage).
    Transient,
    /// The request itself is wrong; repeating it cannot help.
    Permanent,
}

impl RetryClass {
    pub const fn is_transient(self) -> bool {
        matches!(self, RetryClass::Transient)
    }
}
