//! Classify command - one-shot classification from the terminal

use anyhow::{Context, Result, bail};
use email_triage_adapters::document::{self, Upload};
use email_triage_adapters::llm::{
    LlmConfig as AdapterLlmConfig, OpenAiCompatChatClient, StubChatClient,
};
use email_triage_domain::ChatClient;
use email_triage_domain::usecases::{ProcessConfig, ProcessEmailUseCase};
use secrecy::SecretString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::args::ClassifyArgs;
use crate::config::AppConfig;
use crate::http::ProcessResponse;

pub async fn execute(args: ClassifyArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let text = get_input_text(&args).await?;
    if text.trim().is_empty() {
        bail!("No text provided for classification");
    }

    tracing::info!(text_chars = text.chars().count(), "Classifying email");

    let chat = build_chat_client(&config)?;
    let usecase = ProcessEmailUseCase::new(&*chat, process_config(&config));
    let processed = usecase
        .process(&text)
        .await
        .context("Classification failed")?;

    let response = ProcessResponse {
        category: processed.result.category,
        reply: processed.result.suggested_reply,
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&response).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("Category: {}", response.category);
        println!("Interpreted from: {}", processed.tier.as_str());
        println!();
        println!("Suggested reply:");
        println!("{}", response.reply);
    }

    Ok(())
}

pub(crate) fn build_chat_client(config: &AppConfig) -> Result<Box<dyn ChatClient>> {
    match config.llm.provider.as_str() {
        "groq" | "openai_compat" => {
            let base_url = config.llm.base_url.trim();
            if base_url.is_empty() {
                bail!("llm.base_url is required for provider {}", config.llm.provider);
            }

            let api_key = load_api_key(&config.llm.api_key_env);
            if api_key.is_none() {
                tracing::warn!(
                    env_var = %config.llm.api_key_env,
                    "API key not set, requests will fail until it is configured"
                );
            }

            let adapter_config = AdapterLlmConfig {
                model: config.llm.model.clone(),
                base_url: base_url.to_string(),
                timeout_secs: config.llm.timeout_secs,
                reasoning_effort: config.llm.reasoning_effort.clone(),
            };
            let client = OpenAiCompatChatClient::new(api_key, adapter_config)
                .context("Failed to configure chat provider")?;
            tracing::debug!(model = client.model(), base_url, "Chat provider ready");
            Ok(Box::new(client))
        }
        "stub" => Ok(Box::new(StubChatClient::echo())),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

pub(crate) fn process_config(config: &AppConfig) -> ProcessConfig {
    ProcessConfig {
        mode: config.llm.mode,
        classification_max_tokens: config.llm.classification_max_tokens,
        generation_temperature: config.llm.generation_temperature,
        reply_max_tokens: config.llm.reply_max_tokens,
    }
}

/// Read the API key from `env_var`, treating blank values as unset
pub(crate) fn load_api_key(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(|key| SecretString::new(key.into()))
}

async fn get_input_text(args: &ClassifyArgs) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    match args.file {
        Some(ref path) if path.as_os_str() != "-" => read_file(path).await,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;
            Ok(text)
        }
    }
}

async fn read_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let upload = Upload {
        filename: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        content_type: None,
        bytes,
    };

    document::extract_text(upload)
        .await
        .with_context(|| format!("Failed to extract text from {}", path.display()))
}
