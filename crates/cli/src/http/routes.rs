//! Request handlers

use axum::Json;
use axum::extract::State;
use axum::response::Html;
use email_triage_adapters::document;
use email_triage_domain::usecases::ProcessEmailUseCase;
use serde_json::{Value, json};

use super::error::ApiError;
use super::submission::Submission;
use super::{AppState, ProcessResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `GET /` - the upload form
pub async fn index() -> Html<&'static str> {
    tracing::debug!("Rendering index");
    Html(INDEX_HTML)
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "email-triage",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/process` - classify an email and suggest a reply
pub async fn process_email(
    State(state): State<AppState>,
    submission: Submission,
) -> Result<Json<ProcessResponse>, ApiError> {
    tracing::info!(
        has_file = submission.file.is_some(),
        text_chars = submission.text.as_deref().map_or(0, |t| t.chars().count()),
        "Processing email"
    );

    // The file wins when both are sent
    let content = match submission.file {
        Some(upload) => document::extract_text(upload).await?,
        None => submission.text.unwrap_or_default(),
    };

    let usecase = ProcessEmailUseCase::new(&*state.chat, state.process.clone());
    let processed = usecase.process(&content).await?;

    Ok(Json(ProcessResponse {
        category: processed.result.category,
        reply: processed.result.suggested_reply,
    }))
}
