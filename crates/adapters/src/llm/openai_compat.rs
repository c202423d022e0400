//! OpenAI-compatible chat-completions adapter (Groq, OpenAI, and friends)

use async_trait::async_trait;
use email_triage_domain::{ChatClient, ChatError, CompletionParams, PromptMessage};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::LlmConfig;

/// Chat client for any provider exposing `/chat/completions`
pub struct OpenAiCompatChatClient {
    client: Client,
    api_key: Option<SecretString>,
    config: LlmConfig,
}

impl OpenAiCompatChatClient {
    /// Create a client. A missing key is only reported when a call is made.
    pub fn new(api_key: Option<SecretString>, config: LlmConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_api(
        &self,
        api_key: &SecretString,
        messages: &[PromptMessage],
        params: CompletionParams,
    ) -> Result<String, ChatError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: 1.0,
            stream: false,
            reasoning_effort: self.config.reasoning_effort.as_deref(),
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else {
                    ChatError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(ChatError::Timeout),
            Err(e) => return Err(ChatError::Transport(e.to_string())),
        };

        tracing::debug!(body_len = body.len(), "Provider response received");

        Ok(first_completion_text(&body))
    }
}

/// Content of `choices[0].message.content`, or "" when the envelope is off
fn first_completion_text(body: &str) -> String {
    let Ok(envelope) = serde_json::from_str::<Value>(body) else {
        tracing::warn!("Provider response is not JSON");
        return String::new();
    };

    match envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        Some(text) => text.trim().to_string(),
        None => {
            tracing::warn!("Provider response has no completion text");
            String::new()
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[async_trait]
impl ChatClient for OpenAiCompatChatClient {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        params: CompletionParams,
    ) -> Result<String, ChatError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(ChatError::Config("API key not set".to_string()));
        };

        tracing::info!(
            model = %self.config.model,
            messages = messages.len(),
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            "Calling chat provider"
        );

        self.call_api(api_key, messages, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params() -> CompletionParams {
        CompletionParams {
            temperature: 0.0,
            max_tokens: 128,
        }
    }

    fn messages() -> Vec<PromptMessage> {
        vec![
            PromptMessage::system("Classifique o email."),
            PromptMessage::user("EMAIL:\n\"\"\"\nFeliz Natal!\n\"\"\""),
        ]
    }

    fn client_for(server: &MockServer) -> OpenAiCompatChatClient {
        OpenAiCompatChatClient::new(
            Some(SecretString::new("test-key".into())),
            LlmConfig {
                base_url: server.uri(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.1-70b-versatile",
                "temperature": 0.0,
                "max_tokens": 128,
                "stream": false,
                "messages": [
                    {"role": "system", "content": "Classifique o email."},
                    {"role": "user", "content": "EMAIL:\n\"\"\"\nFeliz Natal!\n\"\"\""}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "  {\"label\":\"Improdutivo\"}  "}}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let text = client.complete(&messages(), params()).await.unwrap();

        assert_eq!(text, "{\"label\":\"Improdutivo\"}");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = OpenAiCompatChatClient::new(
            None,
            LlmConfig {
                base_url: mock_server.uri(),
                ..Default::default()
            },
        )
        .unwrap();

        let result = client.complete(&messages(), params()).await;
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[tokio::test]
    async fn test_unexpected_envelope_yields_empty_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let text = client.complete(&messages(), params()).await.unwrap();

        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_non_json_body_yields_empty_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let text = client.complete(&messages(), params()).await.unwrap();

        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_status_error_is_reported_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.complete(&messages(), params()).await;

        match result {
            Err(ChatError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let client = OpenAiCompatChatClient::new(
            Some(SecretString::new("test-key".into())),
            LlmConfig {
                base_url: "http://127.0.0.1:1".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let result = client.complete(&messages(), params()).await;
        assert!(matches!(result, Err(ChatError::Transport(_))));
    }

    #[test]
    fn test_first_completion_text_null_content() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(first_completion_text(body), "");
    }
}
