use crate::errors::StorageError;
use crate::model::{Entity, Page, QueryParams};
use async_trait::async_trait;

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn create(&self, entity: &E) -> Result<(), StorageError>;
    async fn get(&self, id: &str) -> Result<Option<E>, StorageError>;
    async fn select(&self, params: QueryParams) -> Result<Page<E>, StorageError>;
    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}
