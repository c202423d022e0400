//! Email processing use case

use thiserror::Error;

use crate::{
    interpret::{InterpretTier, interpret},
    model::{Category, ClassificationResult, CompletionParams, PipelineMode},
    normalize::{normalize, preview},
    ports::{ChatClient, ChatError},
    prompt::{build_classification_messages, build_reply_prompt, strip_reply_marker},
};

/// Message returned when no content was submitted
pub const EMPTY_CONTENT_MESSAGE: &str = "Nenhum conteúdo foi enviado.";

/// Classification calls always run at this temperature
pub const CLASSIFICATION_TEMPERATURE: f64 = 0.0;

const PREVIEW_CHARS: usize = 200;

/// Configuration for the process use case
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub mode: PipelineMode,
    /// Token budget for the classification call
    pub classification_max_tokens: u32,
    /// Temperature for the reply call (two-step mode only)
    pub generation_temperature: f64,
    /// Token budget for the reply call (two-step mode only)
    pub reply_max_tokens: u32,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            mode: PipelineMode::SingleCall,
            classification_max_tokens: 512,
            generation_temperature: 0.7,
            reply_max_tokens: 180,
        }
    }
}

/// Error type for the process use case
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Outcome of processing one email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub result: ClassificationResult,
    pub tier: InterpretTier,
}

/// Use case for classifying an email and drafting a reply
pub struct ProcessEmailUseCase<C> {
    chat: C,
    config: ProcessConfig,
}

impl<C: ChatClient> ProcessEmailUseCase<C> {
    pub fn new(chat: C, config: ProcessConfig) -> Self {
        Self { chat, config }
    }

    /// Classify `content` and return the category with a suggested reply
    pub async fn process(&self, content: &str) -> Result<Processed, ProcessError> {
        let content = content.trim();
        if content.is_empty() {
            tracing::warn!(reason = "empty_content", "Validation failed");
            return Err(ProcessError::Validation(EMPTY_CONTENT_MESSAGE.to_string()));
        }

        let normalized = normalize(content);
        tracing::debug!(
            content_chars = content.chars().count(),
            normalized_chars = normalized.chars().count(),
            preview = %preview(content, PREVIEW_CHARS),
            "Preprocessed content"
        );

        let messages = build_classification_messages(content);
        let raw = self
            .chat
            .complete(
                &messages,
                CompletionParams {
                    temperature: CLASSIFICATION_TEMPERATURE,
                    max_tokens: self.config.classification_max_tokens,
                },
            )
            .await?;

        let interpretation = interpret(&raw);
        if interpretation.tier.is_degraded() {
            tracing::warn!(
                tier = interpretation.tier.as_str(),
                raw = %preview(&raw, PREVIEW_CHARS),
                "Model output was not valid JSON, used fallback"
            );
        }

        let mut result = interpretation.result;
        tracing::info!(
            category = %result.category,
            tier = interpretation.tier.as_str(),
            "Classified email"
        );

        if self.config.mode == PipelineMode::TwoStep {
            result.suggested_reply = self.draft_reply(result.category, content).await?;
        }

        tracing::debug!(reply_chars = result.suggested_reply.chars().count(), "Reply ready");

        Ok(Processed {
            result,
            tier: interpretation.tier,
        })
    }

    /// Ask the provider for a reply in a separate call
    async fn draft_reply(&self, category: Category, content: &str) -> Result<String, ProcessError> {
        let message = build_reply_prompt(category, content);
        let raw = self
            .chat
            .complete(
                std::slice::from_ref(&message),
                CompletionParams {
                    temperature: self.config.generation_temperature,
                    max_tokens: self.config.reply_max_tokens,
                },
            )
            .await?;

        Ok(strip_reply_marker(&raw).to_string())
    }
}
