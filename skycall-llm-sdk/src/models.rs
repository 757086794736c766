//! Model constants for the supported chat completions provider

/// OpenAI model constants
pub mod openai {
    /// GPT-4o - Flagship multimodal model, default for the demos
    pub const GPT_4O_ID: &str = "gpt-4o";
    pub const GPT_4O_NAME: &str = "GPT-4o";

    /// GPT-4o Mini - Smaller, faster version of GPT-4o
    pub const GPT_4O_MINI_ID: &str = "gpt-4o-mini";
    pub const GPT_4O_MINI_NAME: &str = "GPT-4o Mini";

    /// Default model when none is configured
    pub const DEFAULT: &str = GPT_4O_ID;
}
