use crate::conversation::ConversationError;
use skycall_llm_sdk::error::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Model requested unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("Model returned no choices")]
    EmptyResponse,
}
