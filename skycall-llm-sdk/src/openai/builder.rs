use crate::{
    error::LlmError,
    openai::{
        client::OpenAIClient,
        tools::OpenAIToolFormat,
        types::{
            OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIMessage,
            OpenAIResponseFormat, OpenAIRole, OpenAITool,
        },
    },
    tools::{ProviderToolFormat, Tool, ToolChoice, ToolResult},
};

/// Builder for creating OpenAI chat completion requests
pub struct OpenAIMessageBuilder<'a> {
    client: &'a OpenAIClient,
    model: Option<String>,
    max_completion_tokens: Option<u32>,
    messages: Vec<OpenAIMessage>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    stop: Option<Vec<String>>,
    tools: Option<Vec<OpenAITool>>,
    tool_choice: Option<serde_json::Value>,
    parallel_tool_calls: Option<bool>,
    response_format: Option<OpenAIResponseFormat>,
}

impl<'a> OpenAIMessageBuilder<'a> {
    /// Create a new message builder
    pub fn new(client: &'a OpenAIClient) -> Self {
        Self {
            client,
            model: None,
            max_completion_tokens: None,
            messages: Vec::new(),
            temperature: None,
            top_p: None,
            stop: None,
            tools: None,
            tool_choice: None,
            parallel_tool_calls: None,
            response_format: None,
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum number of completion tokens to generate
    pub fn max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_completion_tokens);
        self
    }

    /// Add a message to the conversation
    ///
    /// Valid roles: "system", "user", "assistant", "tool"
    /// Invalid roles will be treated as "user" by default.
    pub fn message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        let role_str = role.into();
        let role = match role_str.as_str() {
            "system" => OpenAIRole::System,
            "user" => OpenAIRole::User,
            "assistant" => OpenAIRole::Assistant,
            "tool" => OpenAIRole::Tool,
            _ => {
                tracing::warn!("Invalid role '{}', defaulting to 'user'", role_str);
                OpenAIRole::User
            }
        };

        self.messages.push(OpenAIMessage::new(role, content));
        self
    }

    /// Append already-built messages in order
    pub fn messages(mut self, messages: &[OpenAIMessage]) -> Self {
        self.messages.extend_from_slice(messages);
        self
    }

    /// Add a system message
    pub fn system_message(self, content: impl Into<String>) -> Self {
        self.message("system", content)
    }

    /// Add a user message
    pub fn user_message(self, content: impl Into<String>) -> Self {
        self.message("user", content)
    }

    /// Set the temperature for randomness
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top-p sampling parameter
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set custom stop sequences
    pub fn stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.stop = Some(stop_sequences);
        self
    }

    /// Add a tool to the request
    pub fn tool(mut self, tool: Tool) -> Self {
        let tools = self.tools.get_or_insert_with(Vec::new);
        tools.push(OpenAIToolFormat::to_provider_tool(&tool));
        self
    }

    /// Add multiple tools to the request
    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        for tool in tools {
            self = self.tool(tool);
        }
        self
    }

    /// Set tool choice strategy
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(OpenAIToolFormat::to_provider_tool_choice(&choice));
        self
    }

    /// Enable or disable parallel tool calls (provider default: true)
    pub fn parallel_tool_calls(mut self, enabled: bool) -> Self {
        self.parallel_tool_calls = Some(enabled);
        self
    }

    /// Set the response format (text or JSON object)
    pub fn response_format(mut self, format: OpenAIResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Add a tool result to continue the conversation
    pub fn tool_result(mut self, result: ToolResult) -> Self {
        self.messages.push(OpenAIMessage::tool_result(
            result.tool_call_id(),
            result.content(),
        ));
        self
    }

    /// Continue a conversation from a previous response
    pub fn continue_from(mut self, response: &OpenAIChatCompletionResponse) -> Self {
        if let Some(message) = response.first_message() {
            self.messages.push(message.clone());
        }
        self
    }

    /// Assemble the request without sending it
    pub fn build(self) -> Result<OpenAIChatCompletionRequest, LlmError> {
        Ok(OpenAIChatCompletionRequest {
            model: self
                .model
                .ok_or_else(|| LlmError::invalid_request("Model must be specified"))?,
            messages: self.messages,
            max_tokens: None,
            max_completion_tokens: self.max_completion_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            stop: self.stop,
            tools: self.tools,
            tool_choice: self.tool_choice,
            parallel_tool_calls: self.parallel_tool_calls,
            response_format: self.response_format,
        })
    }

    /// Send the request and get the response
    pub async fn send(self) -> Result<OpenAIChatCompletionResponse, LlmError> {
        let client = self.client;
        let request = self.build()?;
        client.create_chat_completion(request).await
    }
}

impl OpenAIClient {
    /// Start building a chat completion request
    pub fn message_builder(&self) -> OpenAIMessageBuilder<'_> {
        OpenAIMessageBuilder::new(self)
    }
}
