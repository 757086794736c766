//! Weather agent: one round of "the model may ask for a weather lookup".
//!
//! The agent sends the conversation with the `get_current_weather` tool
//! attached. A plain text reply ends the run. A tool request is executed
//! against the [`WeatherLookup`], the assistant's call and the lookup output
//! are appended, and the extended conversation is sent once more for the
//! final answer.
//!
//! Only the first tool request in a reply is served. Requests ask the model
//! for a single call (`parallel_tool_calls: false`); if it sends several
//! anyway, the extra calls are dropped from the recorded assistant message
//! and a warning is logged.

use crate::{conversation::Conversation, error::AgentError, weather::WeatherLookup, Agent};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use skycall_llm_sdk::{
    client::ChatClient,
    error::LlmError,
    openai::{
        types::{
            OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIMessage,
            OpenAIToolCall,
        },
        OpenAIToolFormat,
    },
    tools::{ProviderToolFormat, Tool, ToolCall, ToolChoice, ToolResult},
};
use std::sync::Arc;

#[cfg(test)]
mod tests;

pub const GET_CURRENT_WEATHER: &str = "get_current_weather";

pub const DEFAULT_PROMPT: &str = "What's the weather like in Da Nang, Vietnam today?";

/// Arguments the model must supply for a weather lookup
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetWeatherArgs {
    /// The city and country, e.g. "Da Nang, Vietnam"
    pub location: String,
}

pub fn weather_tool() -> Result<Tool, LlmError> {
    Tool::from_type::<GetWeatherArgs>()
        .name(GET_CURRENT_WEATHER)
        .description("Get the current weather for a location")
        .strict(true)
        .build()
}

/// What the model asked for in one reply.
///
/// Tool arguments are left undecoded here; the driver decodes them only for
/// a call it is going to serve.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    TextAnswer(String),
    ToolRequest(OpenAIToolCall),
}

impl ModelReply {
    /// Classify the first choice of a response. Only the first tool call counts.
    pub fn from_response(response: &OpenAIChatCompletionResponse) -> Result<Self, AgentError> {
        let message = response.first_message().ok_or(AgentError::EmptyResponse)?;

        match message.tool_calls.as_ref().and_then(|calls| calls.first()) {
            Some(raw) => Ok(ModelReply::ToolRequest(raw.clone())),
            None => Ok(ModelReply::TextAnswer(message.text().to_string())),
        }
    }
}

/// Where the driver is in its single round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    AwaitingModel,
    AwaitingToolResult,
}

pub struct WeatherAgent {
    client: Arc<dyn ChatClient>,
    weather: Arc<dyn WeatherLookup>,
    model: String,
    tool: Tool,
}

impl WeatherAgent {
    pub fn new(
        client: Arc<dyn ChatClient>,
        weather: Arc<dyn WeatherLookup>,
        model: impl Into<String>,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            client,
            weather,
            model: model.into(),
            tool: weather_tool()?,
        })
    }

    /// Answer a single user prompt
    pub async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        self.run_conversation(Conversation::with_user_message(prompt))
            .await
    }

    pub async fn run_conversation(
        &self,
        mut conversation: Conversation,
    ) -> Result<String, AgentError> {
        let mut state = DriverState::AwaitingModel;
        tracing::debug!(?state, messages = conversation.len(), "Querying model");

        let response = self.send(&conversation).await?;

        let raw = match ModelReply::from_response(&response)? {
            ModelReply::TextAnswer(text) => return Ok(text),
            ModelReply::ToolRequest(raw) => raw,
        };

        state = DriverState::AwaitingToolResult;
        tracing::info!(?state, tool = %raw.function.name, id = %raw.id, "Model requested a tool");

        if raw.function.name != GET_CURRENT_WEATHER {
            return Err(AgentError::UnknownTool {
                name: raw.function.name,
            });
        }

        let call = raw.to_tool_call()?;
        let args: GetWeatherArgs = call.parse_arguments()?;
        let output = self.weather.lookup(&args.location).await;
        tracing::info!(location = %args.location, "{}", output);

        conversation.push_assistant(Self::single_call_message(&response, &call)?)?;
        conversation.push_tool_result(&ToolResult::text(call.id(), output))?;

        // The follow-up is the last round; a further tool request is not served
        let final_response = self.send(&conversation).await?;
        match ModelReply::from_response(&final_response)? {
            ModelReply::TextAnswer(text) => Ok(text),
            ModelReply::ToolRequest(extra) => {
                tracing::warn!(
                    tool = %extra.function.name,
                    "Model requested another tool after the lookup; returning its text"
                );
                Ok(final_response.content().to_string())
            }
        }
    }

    fn request_for(&self, conversation: &Conversation) -> OpenAIChatCompletionRequest {
        let mut request =
            OpenAIChatCompletionRequest::new(self.model.clone(), conversation.messages().to_vec());
        request.tools = Some(vec![OpenAIToolFormat::to_provider_tool(&self.tool)]);
        request.tool_choice = Some(OpenAIToolFormat::to_provider_tool_choice(
            &ToolChoice::Auto,
        ));
        request.parallel_tool_calls = Some(false);
        request
    }

    async fn send(
        &self,
        conversation: &Conversation,
    ) -> Result<OpenAIChatCompletionResponse, AgentError> {
        Ok(self
            .client
            .create_chat_completion(self.request_for(conversation))
            .await?)
    }

    /// The assistant message from `response`, keeping only the served call so
    /// every recorded call id gets a tool result.
    fn single_call_message(
        response: &OpenAIChatCompletionResponse,
        call: &ToolCall,
    ) -> Result<OpenAIMessage, AgentError> {
        let mut message = response
            .first_message()
            .cloned()
            .ok_or(AgentError::EmptyResponse)?;

        if let Some(calls) = message.tool_calls.as_mut() {
            if calls.len() > 1 {
                tracing::warn!(
                    ignored = calls.len() - 1,
                    "Model requested several tool calls; only the first is executed"
                );
            }
            calls.retain(|c| c.id == call.id());
        }

        Ok(message)
    }
}

#[async_trait]
impl Agent for WeatherAgent {
    fn objective(&self) -> &str {
        "Answer questions about the current weather in a place"
    }

    fn tools(&self) -> Vec<Tool> {
        vec![self.tool.clone()]
    }

    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String> {
        Ok(self.run(user_prompt).await?)
    }
}
