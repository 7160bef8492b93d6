pub mod chat;
pub mod errors;
pub mod gateway;
pub mod retry;

pub mod provider {
    pub mod openai;

    pub use openai::{OpenAiChatModel, OpenAiConfig};
}

pub mod prelude {
    pub use crate::chat::{ChatModel, ChatRequest, ChatResponse, Message, ResponseFormat, Role};
    pub use crate::errors::LlmError;
    pub use crate::gateway::{Gateway, LlmGateway};
    pub use crate::provider::{OpenAiChatModel, OpenAiConfig};
    pub use crate::retry::{retry_async, Backoff, RetryPolicy};
}
