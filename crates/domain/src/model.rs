//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification outcome for a submitted email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Requires a follow-up action from the support team
    #[serde(rename = "Produtivo")]
    Productive,
    /// No action needed (greetings, thanks, spam, out-of-office...)
    #[default]
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Category {
    /// Wire label as shown to users and requested from the model
    pub fn label(self) -> &'static str {
        match self {
            Category::Productive => "Produtivo",
            Category::Unproductive => "Improdutivo",
        }
    }

    /// Canonicalize a label extracted from a model response.
    ///
    /// "improdutivo" is checked before "produtivo" because the latter is a
    /// substring of the former. Anything unrecognized is Unproductive.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("improdutivo") {
            Category::Unproductive
        } else if lower.contains("produtivo") {
            Category::Productive
        } else {
            Category::Unproductive
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final answer for one submitted email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Canonical label
    pub category: Category,
    /// Reply draft in pt-BR (may be empty)
    pub suggested_reply: String,
}

impl ClassificationResult {
    pub fn new(category: Category, suggested_reply: impl Into<String>) -> Self {
        Self {
            category,
            suggested_reply: suggested_reply.into(),
        }
    }
}

/// Role of a message in a chat-completion conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// A role-tagged message sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a single completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// How the classification and the reply are obtained from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// One call returns both the label and the reply
    #[default]
    SingleCall,
    /// Classify first, then draft the reply in a second call
    TwoStep,
}
