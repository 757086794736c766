use crate::{error::AgentError, Agent};
use async_trait::async_trait;
use skycall_llm_sdk::{
    client::ChatClient,
    openai::types::{OpenAIChatCompletionRequest, OpenAIMessage},
};
use std::sync::Arc;

pub const DEFAULT_PROMPT: &str = "Write a dad joke about programming.";

/// Single request, single answer. No tools.
pub struct CompletionAgent {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl CompletionAgent {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn complete_once(&self, prompt: &str) -> Result<String, AgentError> {
        let request =
            OpenAIChatCompletionRequest::new(self.model.clone(), vec![OpenAIMessage::user(prompt)]);
        let response = self.client.create_chat_completion(request).await?;

        response
            .first_message()
            .map(|message| message.text().to_string())
            .ok_or(AgentError::EmptyResponse)
    }
}

#[async_trait]
impl Agent for CompletionAgent {
    fn objective(&self) -> &str {
        "Answer a prompt with a single completion"
    }

    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String> {
        Ok(self.complete_once(user_prompt).await?)
    }
}
