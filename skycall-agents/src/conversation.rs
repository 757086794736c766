use skycall_llm_sdk::{
    openai::types::{OpenAIMessage, OpenAIRole},
    tools::ToolResult,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConversationError {
    #[error("Expected a {expected} message, got {found}")]
    UnexpectedRole {
        expected: OpenAIRole,
        found: OpenAIRole,
    },

    #[error("Tool result references call '{id}' that no assistant message issued")]
    UnknownToolCall { id: String },
}

/// Ordered, append-only message history for one run.
///
/// A tool message may only be appended for a call id that an earlier
/// assistant message in this conversation requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<OpenAIMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_message(text: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push_user(text);
        conversation
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(OpenAIMessage::user(text));
    }

    /// Append an assistant message as returned by the model
    pub fn push_assistant(&mut self, message: OpenAIMessage) -> Result<(), ConversationError> {
        if message.role != OpenAIRole::Assistant {
            return Err(ConversationError::UnexpectedRole {
                expected: OpenAIRole::Assistant,
                found: message.role,
            });
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn push_tool_result(&mut self, result: &ToolResult) -> Result<(), ConversationError> {
        let id = result.tool_call_id();
        if !self.issued_call_ids().any(|issued| issued == id) {
            return Err(ConversationError::UnknownToolCall { id: id.to_string() });
        }

        self.messages
            .push(OpenAIMessage::tool_result(id, result.content()));
        Ok(())
    }

    pub fn messages(&self) -> &[OpenAIMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn issued_call_ids(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.role == OpenAIRole::Assistant)
            .filter_map(|m| m.tool_calls.as_ref())
            .flatten()
            .map(|call| call.id.as_str())
    }
}
