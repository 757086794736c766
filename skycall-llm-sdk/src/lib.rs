//! # Skycall LLM SDK
//!
//! A small client for OpenAI-compatible chat completions with typed tool calling.
//!
//! ## Example
//!
//! ```rust,no_run
//! use skycall_llm_sdk::openai::OpenAIClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new("your-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("gpt-4o")
//!         .user_message("Write a dad joke about programming.")
//!         .send()
//!         .await?;
//!
//!     println!("{}", response.content());
//!     Ok(())
//! }
//! ```
//!
//! ## Tool calling
//!
//! ```rust,no_run
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use skycall_llm_sdk::{openai::OpenAIClient, tools::Tool};
//!
//! #[derive(Deserialize, JsonSchema)]
//! #[serde(deny_unknown_fields)]
//! struct Args {
//!     /// City and country, e.g. "Paris, France"
//!     location: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new("your-api-key")?;
//! let tool = Tool::from_type::<Args>()
//!     .name("get_current_weather")
//!     .description("Get current weather for a location")
//!     .strict(true)
//!     .build()?;
//!
//! let response = client
//!     .message_builder()
//!     .model("gpt-4o")
//!     .user_message("What's the weather in Paris?")
//!     .tool(tool)
//!     .send()
//!     .await?;
//!
//! for call in response.tool_calls()?.unwrap_or_default() {
//!     let args: Args = call.parse_arguments()?;
//!     println!("{} -> {}", call.name(), args.location);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod openai;
pub mod providers;
pub mod tools;
