//! Interpretation of raw model output
//!
//! Model output is untrusted text. Interpretation never fails: it tries a
//! JSON object first, then field patterns, then the raw text itself.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::model::{Category, ClassificationResult};

static LABEL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"label"\s*:\s*"(?P<label>[^"]+)""#).expect("Valid regex")
});

static REPLY_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"suggested_reply"\s*:\s*"(?P<reply>[^"]+)""#).expect("Valid regex")
});

/// Which fallback step produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretTier {
    /// Output parsed as a JSON object
    Json,
    /// Field patterns matched in otherwise invalid JSON
    Pattern,
    /// Neither worked; the raw text was used as is
    FreeText,
}

impl InterpretTier {
    pub fn as_str(self) -> &'static str {
        match self {
            InterpretTier::Json => "json",
            InterpretTier::Pattern => "pattern",
            InterpretTier::FreeText => "free_text",
        }
    }

    /// True when the model did not follow the requested JSON format
    pub fn is_degraded(self) -> bool {
        self != InterpretTier::Json
    }
}

/// Result of interpreting one model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub result: ClassificationResult,
    pub tier: InterpretTier,
}

/// Interpret a raw provider response as a classification
pub fn interpret(raw: &str) -> Interpretation {
    if let Some((label, reply)) = parse_json_fields(raw) {
        return Interpretation {
            result: ClassificationResult::new(Category::from_label(&label), reply),
            tier: InterpretTier::Json,
        };
    }

    let label = LABEL_FIELD
        .captures(raw)
        .map(|caps| caps["label"].trim().to_string());
    let reply = REPLY_FIELD
        .captures(raw)
        .map(|caps| caps["reply"].trim().to_string());

    if label.is_some() || reply.is_some() {
        let category = label
            .as_deref()
            .map(Category::from_label)
            .unwrap_or_default();
        return Interpretation {
            result: ClassificationResult::new(category, reply.unwrap_or_default()),
            tier: InterpretTier::Pattern,
        };
    }

    let text = raw.trim();
    Interpretation {
        result: ClassificationResult::new(bare_label(text), text),
        tier: InterpretTier::FreeText,
    }
}

/// Read `label` and `suggested_reply` from a JSON object.
///
/// The raw text is tried as is before any code fence is stripped, so fences
/// inside a valid reply are left alone.
fn parse_json_fields(raw: &str) -> Option<(String, String)> {
    let value: Value = serde_json::from_str(raw.trim())
        .or_else(|_| serde_json::from_str(extract_json(raw)))
        .ok()?;
    let object = value.as_object()?;

    Some((
        field_text(object.get("label")),
        field_text(object.get("suggested_reply")),
    ))
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Free text only counts when it is nothing but a label
fn bare_label(text: &str) -> Category {
    let word = text
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    match word.as_str() {
        "produtivo" => Category::Productive,
        _ => Category::Unproductive,
    }
}

/// Extract JSON from a response (handles markdown code blocks)
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```json") {
        if let Some(end) = trimmed[start + 7..].find("```") {
            return trimmed[start + 7..start + 7 + end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        if let Some(end) = trimmed[start + 3..].find("```") {
            let content = trimmed[start + 3..start + 3 + end].trim();
            // Skip language identifier if present
            if let Some(newline) = content.find('\n') {
                if !content[..newline].starts_with('{') {
                    return content[newline + 1..].trim();
                }
            }
            return content;
        }
    }

    trimmed
}
