use crate::errors::StorageError;
use crate::mock::{InMemoryRepository, MemoryDatastore};
use crate::model::{Entity, Page, QueryParams};
use crate::spi::repo::Repository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use appforge_types::prelude::{Id, Timestamp};

/// One invocation's input and validated output. Append-only: rows are never
/// mutated or individually deleted, only cascaded away with their owning
/// application.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletionLog {
    pub id: Id,
    pub application_id: Id,
    pub input_data: serde_json::Value,
    pub output_data: serde_json::Value,
    pub created_at: Timestamp,
}

impl Entity for CompletionLog {
    const TABLE: &'static str = "completion_logs";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[async_trait]
pub trait CompletionLogStore: Send + Sync {
    async fn append(
        &self,
        application_id: &Id,
        input_data: serde_json::Value,
        output_data: serde_json::Value,
    ) -> Result<CompletionLog, StorageError>;

    /// Logs for one application ordered newest-first, ties in insertion
    /// order. Paging past the end yields an empty page with the true total.
    async fn page(
        &self,
        application_id: &Id,
        offset: u64,
        limit: u64,
    ) -> Result<Page<CompletionLog>, StorageError>;
}

#[derive(Clone)]
pub struct MemoryCompletionLogStore {
    repo: InMemoryRepository<CompletionLog>,
}

impl MemoryCompletionLogStore {
    pub fn new(datastore: &MemoryDatastore) -> Self {
        Self {
            repo: InMemoryRepository::new(datastore),
        }
    }
}

#[async_trait]
impl CompletionLogStore for MemoryCompletionLogStore {
    async fn append(
        &self,
        application_id: &Id,
        input_data: serde_json::Value,
        output_data: serde_json::Value,
    ) -> Result<CompletionLog, StorageError> {
        let log = CompletionLog {
            id: Id::new_random(),
            application_id: application_id.clone(),
            input_data,
            output_data,
            created_at: Timestamp::now(),
        };
        self.repo.create(&log).await?;
        Ok(log)
    }

    async fn page(
        &self,
        application_id: &Id,
        offset: u64,
        limit: u64,
    ) -> Result<Page<CompletionLog>, StorageError> {
        self.repo
            .select(QueryParams {
                filter: json!({ "application_id": application_id.as_str() }),
                order_by: Some("created_at".into()),
                descending: true,
                limit: Some(limit),
                offset: Some(offset),
            })
            .await
    }
}
