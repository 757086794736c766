//! Demo agents on top of `skycall-llm-sdk`: a one-shot completion and a
//! weather assistant that can call a live weather lookup.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod weather;
pub mod weather_agent;

use async_trait::async_trait;
use skycall_llm_sdk::tools::Tool;

/// Trait defining the structure and behavior of an AI agent
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent's clear objective
    fn objective(&self) -> &str;

    /// Returns the tools offered to the model
    fn tools(&self) -> Vec<Tool> {
        Vec::new()
    }

    /// Execute the agent with the given user prompt
    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String>;
}
