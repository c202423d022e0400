//! Chat provider adapters

pub mod openai_compat;
pub mod stub;

pub use openai_compat::OpenAiCompatChatClient;
pub use stub::StubChatClient;

use serde::{Deserialize, Serialize};

/// Groq's OpenAI-compatible endpoint
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Common chat provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional `reasoning_effort` passed through to models that support it
    pub reasoning_effort: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-70b-versatile".to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            timeout_secs: 60,
            reasoning_effort: None,
        }
    }
}
