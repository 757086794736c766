pub mod builder;
pub mod client;
pub mod tools;
pub mod types;

pub use builder::OpenAIMessageBuilder;
pub use client::OpenAIClient;
pub use tools::OpenAIToolFormat;
pub use types::*;
