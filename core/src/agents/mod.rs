pub mod chat;
pub mod config;

pub use chat::{ChatMessage, ChatModel, ChatResponse, OpenAiChatClient, UsageMetrics};
pub use config::LlmSettings;
