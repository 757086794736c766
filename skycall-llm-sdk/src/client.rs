use crate::{
    error::LlmError,
    openai::types::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse},
};
use async_trait::async_trait;

/// Core trait for chat completion clients
///
/// Anything that speaks the chat completions wire format can sit behind this
/// trait, which lets callers swap the hosted endpoint for a scripted one.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one chat completion request (non-streaming)
    async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError>;

    /// Get provider name (e.g., "openai")
    fn provider_name(&self) -> &str;
}
