//! Stub chat client for testing and offline mode

use async_trait::async_trait;
use email_triage_domain::{ChatClient, ChatError, CompletionParams, PromptMessage, Role};
use serde_json::json;

/// Words that make the echo stub answer "Produtivo"
const ACTION_KEYWORDS: &[&str] = &[
    "status", "chamado", "protocolo", "anexo", "solicit", "erro", "prazo", "caso",
];

/// Stub chat client that returns configurable responses
pub struct StubChatClient {
    response: Option<String>,
    error: Option<ChatError>,
}

impl StubChatClient {
    /// Create a stub that always returns the given raw text
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: ChatError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Create a stub that answers with JSON based on keywords in the email
    pub fn echo() -> Self {
        Self {
            response: None,
            error: None,
        }
    }
}

impl Default for StubChatClient {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl ChatClient for StubChatClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        _params: CompletionParams,
    ) -> Result<String, ChatError> {
        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        // Echo mode: look for action keywords in the last user message
        let email = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();

        let productive = ACTION_KEYWORDS.iter().any(|k| email.contains(k));
        let (label, reply) = if productive {
            (
                "Produtivo",
                "Recebemos sua solicitação e estamos analisando. Retornaremos em breve.",
            )
        } else {
            ("Improdutivo", "Agradecemos a mensagem!")
        };

        Ok(json!({ "label": label, "suggested_reply": reply }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CompletionParams {
        CompletionParams {
            temperature: 0.0,
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn test_configured_response() {
        let stub = StubChatClient::with_response("raw text");
        let text = stub.complete(&[], params()).await.unwrap();
        assert_eq!(text, "raw text");
    }

    #[tokio::test]
    async fn test_error_stub() {
        let stub = StubChatClient::with_error(ChatError::Timeout);
        let result = stub.complete(&[], params()).await;
        assert!(matches!(result, Err(ChatError::Timeout)));
    }

    #[tokio::test]
    async fn test_echo_stub() {
        let stub = StubChatClient::echo();

        let productive = stub
            .complete(
                &[PromptMessage::user("Qual o status do chamado 42?")],
                params(),
            )
            .await
            .unwrap();
        assert!(productive.contains("\"Produtivo\""));

        let unproductive = stub
            .complete(&[PromptMessage::user("Feliz Natal!")], params())
            .await
            .unwrap();
        assert!(unproductive.contains("\"Improdutivo\""));
    }
}
