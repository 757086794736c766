use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    error::LlmError,
    openai::types::{
        OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIErrorResponse,
        OpenAIMessage, OpenAIToolCall,
    },
    tools::ToolCall,
};

/// Default endpoint for the hosted API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI LLM client
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a chat completion using the OpenAI Chat Completions API
    pub async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, |t| t.len()),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let openai_response: OpenAIChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            tracing::debug!(
                id = %openai_response.id,
                finish_reason = ?openai_response.choices.first().and_then(|c| c.finish_reason.as_deref()),
                "Received chat completion"
            );
            Ok(openai_response)
        } else {
            // Extract retry-after header before consuming the response
            let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                response
                    .headers()
                    .get("retry-after")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
            } else {
                None
            };

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(status = status.as_u16(), "Chat completion request failed");
            Err(map_error_response(status, error_text, retry_after))
        }
    }
}

/// Map a non-2xx response to an [`LlmError`], preferring the provider's own
/// error message when the body is a standard error envelope.
fn map_error_response(
    status: reqwest::StatusCode,
    error_text: String,
    retry_after: Option<u64>,
) -> LlmError {
    let message = serde_json::from_str::<OpenAIErrorResponse>(&error_text)
        .map(|e| e.error.message)
        .unwrap_or(error_text);

    match status {
        reqwest::StatusCode::BAD_REQUEST => LlmError::invalid_request(message),
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            LlmError::authentication(message)
        }
        reqwest::StatusCode::PAYLOAD_TOO_LARGE => LlmError::invalid_request("Request too large"),
        reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limit(message, retry_after),
        _ => LlmError::api_error(status.as_u16(), message),
    }
}

impl OpenAIChatCompletionResponse {
    /// Message of the first choice, if any
    pub fn first_message(&self) -> Option<&OpenAIMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Get the text content of the first choice
    pub fn content(&self) -> &str {
        self.first_message().map_or("", |message| message.text())
    }

    /// Extract tool calls from the first choice.
    ///
    /// Arguments arrive as a JSON string; a string that is not valid JSON is
    /// reported as [`LlmError::ToolArgumentParse`].
    pub fn tool_calls(&self) -> Result<Option<Vec<ToolCall>>, LlmError> {
        let Some(calls) = self
            .first_message()
            .and_then(|message| message.tool_calls.as_ref())
        else {
            return Ok(None);
        };

        calls
            .iter()
            .map(OpenAIToolCall::to_tool_call)
            .collect::<Result<Vec<_>, LlmError>>()
            .map(Some)
    }
}

impl OpenAIToolCall {
    /// Decode the JSON-string arguments into a [`ToolCall`]
    pub fn to_tool_call(&self) -> Result<ToolCall, LlmError> {
        let arguments: serde_json::Value =
            serde_json::from_str(&self.function.arguments).map_err(|e| {
                LlmError::ToolArgumentParse {
                    tool_name: self.function.name.clone(),
                    source: e,
                }
            })?;

        Ok(ToolCall::new(
            self.id.clone(),
            self.function.name.clone(),
            arguments,
        ))
    }
}

#[async_trait]
impl crate::client::ChatClient for OpenAIClient {
    async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError> {
        OpenAIClient::create_chat_completion(self, request).await
    }

    fn provider_name(&self) -> &str {
        crate::providers::OPENAI
    }
}
