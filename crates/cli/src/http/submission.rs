//! Extraction of the submitted email from a request body

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::{Form, Json};
use email_triage_adapters::document::Upload;
use serde::Deserialize;

use super::error::ApiError;

/// The `file` and `text` fields of a process request
#[derive(Debug, Default)]
pub struct Submission {
    pub file: Option<Upload>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TextBody {
    #[serde(default)]
    text: Option<String>,
}

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<TextBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Ok(Self {
                file: None,
                text: body.text,
            });
        }

        if content_type.is_empty() {
            // Nothing declared, nothing submitted
            return Ok(Self::default());
        }

        let Form(body) = Form::<TextBody>::from_request(req, state)
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
        Ok(Self {
            file: None,
            text: body.text,
        })
    }
}

impl Submission {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

                    let upload = Upload {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    };
                    if !upload.is_blank() {
                        submission.file = Some(upload);
                    }
                }
                "text" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
                    submission.text = Some(text);
                }
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown form field");
                }
            }
        }

        Ok(submission)
    }
}
