pub use crate::errors::StorageError;
pub use crate::mock::{InMemoryRepository, MemoryDatastore};
pub use crate::model::application::{Application, ApplicationStore, MemoryApplicationStore};
pub use crate::model::completion_log::{
    CompletionLog, CompletionLogStore, MemoryCompletionLogStore,
};
pub use crate::model::{Entity, Page, QueryParams};
pub use crate::spi::{HealthProbe, Repository};
