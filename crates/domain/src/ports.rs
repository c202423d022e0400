//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CompletionParams, PromptMessage};

/// Error type for chat provider calls
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Missing or unusable provider settings (e.g. no API key)
    #[error("Configuration error: {0}")]
    Config(String),
    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    /// The provider answered with a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ChatError {
    /// Whether the failure lies with the provider rather than with us
    pub fn is_upstream(&self) -> bool {
        !matches!(self, ChatError::Config(_))
    }
}

/// Port for a hosted chat-completion model
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `messages` and return the text of the first completion.
    ///
    /// An envelope that cannot be read yields `Ok(String::new())`; callers
    /// treat empty text as "no usable output".
    async fn complete(
        &self,
        messages: &[PromptMessage],
        params: CompletionParams,
    ) -> Result<String, ChatError>;
}

#[async_trait]
impl<C: ChatClient + ?Sized> ChatClient for &C {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        params: CompletionParams,
    ) -> Result<String, ChatError> {
        (*self).complete(messages, params).await
    }
}
