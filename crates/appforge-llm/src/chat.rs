use crate::errors::LlmError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Constrains the model to emit JSON conforming to the given schema, with
/// no explanatory prose around it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub json_schema: serde_json::Value,
    pub strict: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model_id: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub model_id: String,
    /// Raw text of the first choice. Parsing is the caller's concern.
    pub text: String,
}

#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError>;
}
