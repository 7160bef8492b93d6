use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode, Url,
};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatModel, ChatRequest, ChatResponse, Role};
use crate::errors::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const RESPONSE_SCHEMA_NAME: &str = "response_schema";

/// Configuration options for the OpenAI provider.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|err| LlmError::unknown(&format!("openai base url parse failed: {err}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            request_timeout: Duration::from_secs(30),
        })
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, LlmError> {
        self.base_url = Url::parse(base_url.as_ref())
            .map_err(|err| LlmError::unknown(&format!("openai base url parse failed: {err}")))?;
        if !self.base_url.path().ends_with('/') {
            self.base_url
                .set_path(&format!("{}/", self.base_url.path().trim_end_matches('/')));
        }
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

pub struct OpenAiChatModel {
    client: Client,
    chat_url: Url,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = format!("Bearer {}", config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|err| LlmError::unknown(&format!("invalid openai api key: {err}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| LlmError::unknown(&format!("openai client build failed: {err}")))?;

        let chat_url = config
            .base_url
            .join(CHAT_COMPLETIONS_PATH)
            .map_err(|err| LlmError::unknown(&format!("openai chat url join failed: {err}")))?;

        Ok(Self { client, chat_url })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OutboundMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaSpec,
}

#[derive(Serialize)]
struct JsonSchemaSpec {
    name: &'static str,
    schema: serde_json::Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: InboundMessage,
}

#[derive(Deserialize)]
struct InboundMessage {
    #[serde(default)]
    content: Option<String>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn map_status_error(status: StatusCode, body: &str) -> LlmError {
    // Every non-2xx is treated as transient from the caller's point of
    // view; the retry budget bounds how long we keep trying.
    LlmError::provider_unavailable(&format!("upstream returned status {status}: {body}"))
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChatModel {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        let payload = ChatCompletionRequest {
            model: &req.model_id,
            messages: req
                .messages
                .iter()
                .map(|m| OutboundMessage {
                    role: role_name(m.role),
                    content: &m.content,
                })
                .collect(),
            response_format: req.response_format.as_ref().map(|format| ResponseFormatSpec {
                format_type: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: RESPONSE_SCHEMA_NAME,
                    schema: format.json_schema.clone(),
                    strict: format.strict,
                },
            }),
        };

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::timeout(&format!("openai request timed out: {err}"))
                } else {
                    LlmError::provider_unavailable(&format!("openai request error: {err}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| LlmError::provider_unavailable(&format!("response body error: {err}")))?;

        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::provider_unavailable(&format!("response decode error: {err}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::provider_unavailable("response carried no choices"))?;

        Ok(ChatResponse {
            model_id: parsed.model,
            text,
        })
    }
}
