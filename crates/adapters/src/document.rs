//! Text extraction from uploaded files

use thiserror::Error;

/// One uploaded file as received from a client
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// A browser sends an empty, unnamed part when no file was picked
    pub fn is_blank(&self) -> bool {
        self.bytes.is_empty() && self.filename.as_deref().is_none_or(|n| n.trim().is_empty())
    }

    fn kind(&self) -> DocumentKind {
        let content_type = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_lowercase());
        let filename = self.filename.as_deref().unwrap_or_default().to_lowercase();

        if content_type.as_deref() == Some("text/plain") || filename.ends_with(".txt") {
            DocumentKind::PlainText
        } else if content_type.as_deref() == Some("application/pdf") || filename.ends_with(".pdf")
        {
            DocumentKind::Pdf
        } else {
            DocumentKind::Unknown
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    PlainText,
    Pdf,
    Unknown,
}

/// Error type for document extraction
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Decode an upload into email text.
///
/// Plain text and unknown types are decoded as UTF-8 with invalid bytes
/// dropped. PDFs are extracted page by page on the blocking pool.
pub async fn extract_text(upload: Upload) -> Result<String, DocumentError> {
    let kind = upload.kind();
    tracing::debug!(
        filename = ?upload.filename,
        content_type = ?upload.content_type,
        bytes = upload.bytes.len(),
        ?kind,
        "Reading upload"
    );

    match kind {
        DocumentKind::PlainText | DocumentKind::Unknown => Ok(decode_utf8_lossless(&upload.bytes)),
        DocumentKind::Pdf => {
            tokio::task::spawn_blocking(move || pdf_text(&upload.bytes))
                .await
                .map_err(|e| DocumentError::Task(e.to_string()))?
        }
    }
}

/// Join the text of every PDF page with newlines
pub fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocumentError::Pdf(e.to_string()))?;
    Ok(pages.join("\n"))
}

/// UTF-8 decode that skips invalid sequences instead of replacing them
pub fn decode_utf8_lossless(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Upload {
        Upload {
            filename: filename.map(str::to_string),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_utf8_lossless(b"ol\xffa \xc3\xa7"), "ola ç");
        assert_eq!(decode_utf8_lossless(b""), "");
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(
            upload(Some("mail.TXT"), None, b"").kind(),
            DocumentKind::PlainText
        );
        assert_eq!(
            upload(None, Some("text/plain; charset=utf-8"), b"").kind(),
            DocumentKind::PlainText
        );
        assert_eq!(upload(Some("a.pdf"), None, b"").kind(), DocumentKind::Pdf);
        assert_eq!(
            upload(Some("scan"), Some("application/pdf"), b"").kind(),
            DocumentKind::Pdf
        );
        assert_eq!(
            upload(Some("mail.eml"), Some("message/rfc822"), b"").kind(),
            DocumentKind::Unknown
        );
    }

    #[test]
    fn test_blank_upload() {
        assert!(upload(None, None, b"").is_blank());
        assert!(upload(Some(""), Some("application/octet-stream"), b"").is_blank());
        assert!(!upload(Some("empty.txt"), None, b"").is_blank());
        assert!(!upload(None, None, b"x").is_blank());
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let text = extract_text(upload(Some("email.txt"), Some("text/plain"), "Bom dia!".as_bytes()))
            .await
            .unwrap();
        assert_eq!(text, "Bom dia!");
    }

    #[tokio::test]
    async fn test_extract_unknown_type_as_utf8() {
        let text = extract_text(upload(Some("email.eml"), None, b"Subject: oi\n\nTudo bem?"))
            .await
            .unwrap();
        assert_eq!(text, "Subject: oi\n\nTudo bem?");
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_an_error() {
        let result = extract_text(upload(Some("email.pdf"), None, b"not a pdf")).await;
        assert!(matches!(result, Err(DocumentError::Pdf(_))));
    }
}
