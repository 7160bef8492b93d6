use crate::errors::PipelineError;
use appforge_llm::gateway::Gateway;
use appforge_schema::validate::SchemaValidator;
use appforge_storage::prelude::{Application, ApplicationStore, CompletionLog, CompletionLogStore};
use appforge_types::prelude::Id;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// One page of completion logs plus pagination metadata.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LogPage {
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
    pub items: Vec<CompletionLog>,
}

/// Orchestrates the invocation pipeline. Holds no cross-request mutable
/// state; every handle is an injected, process-wide singleton owned here.
pub struct ApplicationService {
    apps: Arc<dyn ApplicationStore>,
    logs: Arc<dyn CompletionLogStore>,
    gateway: Arc<dyn Gateway>,
    validator: SchemaValidator,
}

impl ApplicationService {
    pub fn new(
        apps: Arc<dyn ApplicationStore>,
        logs: Arc<dyn CompletionLogStore>,
        gateway: Arc<dyn Gateway>,
    ) -> Self {
        Self {
            apps,
            logs,
            gateway,
            validator: SchemaValidator::new(),
        }
    }

    /// Registers an application after checking that both schemas are
    /// well-formed Draft-7 documents. Either schema failing rejects the
    /// whole creation.
    pub async fn create_application(
        &self,
        prompt_config: String,
        input_schema: Value,
        output_schema: Value,
    ) -> Result<Application, PipelineError> {
        self.validator.check_schema_well_formed(&input_schema)?;
        self.validator.check_schema_well_formed(&output_schema)?;

        let application = self
            .apps
            .create(prompt_config, input_schema, output_schema)
            .await?;
        info!(application_id = %application.id, "application created");
        Ok(application)
    }

    pub async fn get_application(&self, id: &Id) -> Result<Application, PipelineError> {
        self.apps
            .get(id)
            .await?
            .ok_or_else(PipelineError::application_not_found)
    }

    /// Deletes the application and every completion log it owns.
    pub async fn delete_application(&self, id: &Id) -> Result<(), PipelineError> {
        self.get_application(id).await?;
        if !self.apps.delete(id).await? {
            return Err(PipelineError::application_not_found());
        }
        info!(application_id = %id, "application deleted");
        Ok(())
    }

    /// The invoke pipeline: fetch → validate input → LLM call → parse →
    /// validate output → append log. A log entry is never written for an
    /// invocation whose call failed or whose output failed validation.
    pub async fn generate_completion(
        &self,
        application_id: &Id,
        input_data: Value,
    ) -> Result<Value, PipelineError> {
        let application = self.get_application(application_id).await?;

        self.validator
            .validate_instance(&input_data, &application.input_schema)
            .map_err(|err| PipelineError::input_invalid(err.message()))?;

        let raw = self
            .gateway
            .invoke(
                &application.prompt_config,
                &input_data,
                &application.output_schema,
            )
            .await?;

        let output_data: Value = serde_json::from_str(&raw).map_err(|err| {
            PipelineError::output_invalid(&format!("model response is not valid JSON: {err}"))
        })?;

        self.validator
            .validate_instance(&output_data, &application.output_schema)
            .map_err(|err| PipelineError::output_invalid(err.message()))?;

        let log = self
            .logs
            .append(application_id, input_data, output_data.clone())
            .await?;
        debug!(application_id = %application_id, log_id = %log.id, "completion logged");

        Ok(output_data)
    }

    /// Paginated completion history, newest first. `page` and `size` are
    /// 1-based and must both be at least 1.
    pub async fn list_logs(
        &self,
        application_id: &Id,
        page: u64,
        size: u64,
    ) -> Result<LogPage, PipelineError> {
        if page < 1 || size < 1 {
            return Err(PipelineError::input_invalid(
                "page and size must both be at least 1",
            ));
        }
        self.get_application(application_id).await?;

        let offset = (page - 1)
            .checked_mul(size)
            .ok_or_else(|| PipelineError::input_invalid("page is out of range"))?;
        let logs = self.logs.page(application_id, offset, size).await?;

        Ok(LogPage {
            total: logs.total,
            page,
            size,
            total_pages: logs.total.div_ceil(size),
            items: logs.items,
        })
    }
}
