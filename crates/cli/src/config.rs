//! Configuration loading and management

use anyhow::{Context, Result};
use config::Map;
use email_triage_domain::PipelineMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "EMAIL_TRIAGE";

/// Unprefixed variables still honoured, with the key they override
const LEGACY_ENV: &[(&str, &str)] = &[
    ("GROQ_MODEL", "llm.model"),
    ("GENERATION_TEMPERATURE", "llm.generation_temperature"),
];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_cors_allow_origins")]
    pub cors_allow_origins: Vec<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f64,

    #[serde(default = "default_classification_max_tokens")]
    pub classification_max_tokens: u32,

    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    #[serde(default)]
    pub reasoning_effort: Option<String>,

    #[serde(default)]
    pub mode: PipelineMode,
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_cors_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_base_url() -> String {
    email_triage_adapters::llm::GROQ_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_generation_temperature() -> f64 {
    0.7
}

fn default_classification_max_tokens() -> u32 {
    512
}

fn default_reply_max_tokens() -> u32 {
    180
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_allow_origins: default_cors_allow_origins(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
            generation_temperature: default_generation_temperature(),
            classification_max_tokens: default_classification_max_tokens(),
            reply_max_tokens: default_reply_max_tokens(),
            reasoning_effort: None,
            mode: PipelineMode::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and the process environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, std::env::vars().collect())
    }

    /// Load configuration from file and the given environment variables
    pub fn load_with_env(config_path: Option<&Path>, env: Map<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Overrides beat every source, so a legacy variable is skipped when
        // its prefixed counterpart is present
        for (legacy_var, key) in LEGACY_ENV {
            if prefixed_var_set(&env, key) {
                continue;
            }
            builder = builder
                .set_override_option(*key, env.get(*legacy_var).cloned())
                .with_context(|| format!("Invalid value in {}", legacy_var))?;
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_allow_origins")
                .try_parsing(true)
                .source(Some(env)),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# email-triage configuration
#
# Every key can be overridden from the environment, e.g.
#   EMAIL_TRIAGE__LLM__MODEL=llama-3.3-70b-versatile
#   EMAIL_TRIAGE__SERVER__CORS_ALLOW_ORIGINS=http://a.example,http://b.example
# GROQ_MODEL and GENERATION_TEMPERATURE are also honoured.

[server]
bind = "127.0.0.1:8000"
cors_allow_origins = ["*"]
max_upload_bytes = 10485760

[llm]
provider = "groq"  # groq, openai_compat, stub
model = "llama-3.1-70b-versatile"
base_url = "https://api.groq.com/openai/v1"
api_key_env = "GROQ_API_KEY"
timeout_secs = 60
classification_max_tokens = 512
# Only used when mode = "two_step"
generation_temperature = 0.7
reply_max_tokens = 180
mode = "single_call"  # single_call, two_step
# reasoning_effort = "low"
"#
        .to_string()
    }
}

fn prefixed_var_set(env: &Map<String, String>, key: &str) -> bool {
    let name = format!(
        "{}__{}",
        ENV_PREFIX,
        key.replace('.', "__").to_uppercase()
    );
    env.contains_key(&name)
}
