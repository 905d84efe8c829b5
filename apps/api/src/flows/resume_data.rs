//! Decoding of resumes submitted as `data:<mime>;base64,<payload>` blobs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::errors::AppError;

/// Decoded-size cap for a single resume.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const PDF: &str = "application/pdf";
const TEXT_MIMES: &[&str] = &["text/plain", "text/markdown"];

#[derive(Debug, Error)]
pub enum ResumeDecodeError {
    #[error("resume must be a data URI of the form data:<mime>;base64,<payload>")]
    Malformed,

    #[error("resume payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("resume is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("resume type '{0}' is not supported; upload a PDF or plain-text file")]
    UnsupportedType(String),

    #[error("resume text could not be read: {0}")]
    Unreadable(String),

    #[error("resume contains no readable text")]
    Empty,
}

impl From<ResumeDecodeError> for AppError {
    fn from(err: ResumeDecodeError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResume {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn decode_data_uri(uri: &str) -> Result<DecodedResume, ResumeDecodeError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or(ResumeDecodeError::Malformed)?;
    let (header, payload) = rest.split_once(',').ok_or(ResumeDecodeError::Malformed)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(ResumeDecodeError::Malformed)?
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime_type != PDF && !TEXT_MIMES.contains(&mime_type.as_str()) {
        return Err(ResumeDecodeError::UnsupportedType(mime_type));
    }

    // Reject before decoding: base64 expands 3 bytes into 4 characters.
    let estimated = payload.len() / 4 * 3;
    if estimated > MAX_RESUME_BYTES {
        return Err(ResumeDecodeError::TooLarge {
            size: estimated,
            max: MAX_RESUME_BYTES,
        });
    }

    let bytes = STANDARD.decode(payload.trim())?;
    if bytes.len() > MAX_RESUME_BYTES {
        return Err(ResumeDecodeError::TooLarge {
            size: bytes.len(),
            max: MAX_RESUME_BYTES,
        });
    }

    Ok(DecodedResume { mime_type, bytes })
}

/// Extracts plain text. PDF parsing is CPU-bound; call from `spawn_blocking`.
pub fn extract_text(resume: &DecodedResume) -> Result<String, ResumeDecodeError> {
    let text = if resume.mime_type == PDF {
        pdf_extract::extract_text_from_mem(&resume.bytes)
            .map_err(|e| ResumeDecodeError::Unreadable(e.to_string()))?
    } else {
        String::from_utf8(resume.bytes.clone())
            .map_err(|e| ResumeDecodeError::Unreadable(e.to_string()))?
    };

    let normalized = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    if normalized.is_empty() {
        return Err(ResumeDecodeError::Empty);
    }
    Ok(normalized)
}

/// Decodes and extracts in one step, off the async runtime.
pub async fn resume_text_from_data_uri(uri: String) -> Result<(String, String), AppError> {
    let (mime_type, text) = tokio::task::spawn_blocking(move || {
        let decoded = decode_data_uri(&uri)?;
        let text = extract_text(&decoded)?;
        Ok::<_, ResumeDecodeError>((decoded.mime_type, text))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("resume extraction task failed: {e}")))??;
    Ok((mime_type, text))
}
