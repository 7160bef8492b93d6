use serde::{Deserialize, Serialize};

pub trait Entity: Sized + serde::de::DeserializeOwned + Serialize + Send + Sync {
    const TABLE: &'static str;
    fn id(&self) -> &str;
}

/// One page of results plus the total count of everything the filter
/// matched, regardless of offset/limit. Callers derive page arithmetic
/// from `total`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryParams {
    /// Top-level field equality filter.
    pub filter: serde_json::Value,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            filter: serde_json::json!({}),
            order_by: None,
            descending: false,
            limit: None,
            offset: None,
        }
    }
}

pub mod application;
pub mod completion_log;
