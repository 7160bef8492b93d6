use crate::chat::{ChatModel, ChatRequest, Message, ResponseFormat};
use crate::errors::LlmError;
use crate::retry::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Outbound boundary of the invocation pipeline: issues the model call and
/// applies the retry policy. Returns raw model text; parsing and schema
/// validation of the payload belong to the caller.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn invoke(
        &self,
        prompt_config: &str,
        input_data: &Value,
        output_schema: &Value,
    ) -> Result<String, LlmError>;
}

pub struct LlmGateway {
    model: Arc<dyn ChatModel>,
    model_id: String,
    retry: RetryPolicy,
}

impl LlmGateway {
    pub fn new(model: Arc<dyn ChatModel>, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Rejects any property the schema does not declare, so the model cannot
/// smuggle extra fields past validation.
fn tighten_schema(output_schema: &Value) -> Value {
    match output_schema {
        Value::Object(map) => {
            let mut tightened = map.clone();
            tightened.insert("additionalProperties".into(), Value::Bool(false));
            Value::Object(tightened)
        }
        other => other.clone(),
    }
}

#[async_trait::async_trait]
impl Gateway for LlmGateway {
    async fn invoke(
        &self,
        prompt_config: &str,
        input_data: &Value,
        output_schema: &Value,
    ) -> Result<String, LlmError> {
        let user_content = serde_json::to_string(input_data)
            .map_err(|err| LlmError::schema(&format!("input serialization failed: {err}")))?;

        let request = ChatRequest {
            model_id: self.model_id.clone(),
            messages: vec![Message::system(prompt_config), Message::user(user_content)],
            response_format: Some(ResponseFormat {
                json_schema: tighten_schema(output_schema),
                strict: true,
            }),
        };

        let response = crate::retry::retry_async(&self.retry, |attempt| {
            let request = request.clone();
            let model = self.model.clone();
            async move {
                debug!(attempt, model_id = %request.model_id, "dispatching chat completion");
                model.chat(request).await
            }
        })
        .await?;

        Ok(response.text)
    }
}
