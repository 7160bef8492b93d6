use crate::errors::StorageError;
use async_trait::async_trait;

/// Cheap liveness check against the persistence backend, used by the
/// transport's health endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), StorageError>;
}
