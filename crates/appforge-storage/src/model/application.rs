use crate::errors::StorageError;
use crate::mock::{InMemoryRepository, MemoryDatastore};
use crate::model::Entity;
use crate::spi::repo::Repository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use appforge_types::prelude::{Id, Timestamp};

use super::completion_log::CompletionLog;

/// A registered prompt + input/output schema triple. Immutable once created;
/// prompt or schema changes are delete + recreate so log provenance stays
/// intact.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: Id,
    pub prompt_config: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
    pub created_at: Timestamp,
}

impl Entity for Application {
    const TABLE: &'static str = "applications";

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create(
        &self,
        prompt_config: String,
        input_schema: serde_json::Value,
        output_schema: serde_json::Value,
    ) -> Result<Application, StorageError>;

    async fn get(&self, id: &Id) -> Result<Option<Application>, StorageError>;

    /// Removes the application and all of its completion logs as one atomic
    /// unit. Returns false when the id was absent.
    async fn delete(&self, id: &Id) -> Result<bool, StorageError>;
}

#[derive(Clone)]
pub struct MemoryApplicationStore {
    datastore: MemoryDatastore,
    repo: InMemoryRepository<Application>,
}

impl MemoryApplicationStore {
    pub fn new(datastore: &MemoryDatastore) -> Self {
        Self {
            datastore: datastore.clone(),
            repo: InMemoryRepository::new(datastore),
        }
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn create(
        &self,
        prompt_config: String,
        input_schema: serde_json::Value,
        output_schema: serde_json::Value,
    ) -> Result<Application, StorageError> {
        let application = Application {
            id: Id::new_random(),
            prompt_config,
            input_schema,
            output_schema,
            created_at: Timestamp::now(),
        };
        self.repo.create(&application).await?;
        Ok(application)
    }

    async fn get(&self, id: &Id) -> Result<Option<Application>, StorageError> {
        self.repo.get(id.as_str()).await
    }

    async fn delete(&self, id: &Id) -> Result<bool, StorageError> {
        Ok(self.datastore.remove_cascade(
            Application::TABLE,
            id.as_str(),
            CompletionLog::TABLE,
            "application_id",
        ))
    }
}
