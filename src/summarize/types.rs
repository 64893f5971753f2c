//! Request, result, and error types for the summarize pipeline.

use crate::generation::GenerationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Largest upload accepted by the structured summarize endpoint (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME reported for uploads that arrived without a declared content type.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Errors produced while turning an upload into a summary.
///
/// Client errors map to `400`; everything else is reported as `500` with the underlying message.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Credential missing, empty, or rejected by the provider.
    #[error("Server configuration error: {0}")]
    Configuration(String),
    /// Multipart body carried no `file` field.
    #[error("No file uploaded; send the document in a multipart field named 'file'")]
    MissingFile,
    /// Multipart body could not be read.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    /// Upload exceeded the size cap.
    #[error("File too large (limit is {limit} bytes)")]
    PayloadTooLarge {
        /// Cap in bytes.
        limit: usize,
    },
    /// Filename extension is not accepted by the text-only endpoint.
    #[error("Unsupported file type '{0}'. Only .txt files are accepted.")]
    UnsupportedFileType(String),
    /// Decoded text is blank.
    #[error("No text found in file.")]
    EmptyContent,
    /// Strict UTF-8 decoding failed.
    #[error("Failed to decode file as UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
    /// Provider answered without a candidate or content part.
    #[error("No summary generated.")]
    NoSummaryGenerated,
    /// Provider call failed.
    #[error("Summary generation failed: {0}")]
    Upstream(GenerationError),
    /// Provider reply was not the JSON object we asked for.
    #[error("Summary generation failed: malformed JSON reply: {0}")]
    MalformedReply(String),
}

impl SummarizeError {
    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile
                | Self::InvalidUpload(_)
                | Self::PayloadTooLarge { .. }
                | Self::UnsupportedFileType(_)
                | Self::EmptyContent
        )
    }
}

impl From<GenerationError> for SummarizeError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::Unauthorized(message) => Self::Configuration(message),
            other => Self::Upstream(other),
        }
    }
}

/// A single uploaded document, alive for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename declared by the client (may be empty).
    pub filename: String,
    /// Content type declared by the client.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Declared content type, or [`FALLBACK_MIME`] when none was sent.
    pub fn mime_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(FALLBACK_MIME)
    }

    /// Hex SHA-256 of the contents, used to correlate uploads in logs.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

/// Response of the text-only endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSummary {
    /// Trimmed summary text.
    pub summary: String,
}

/// Response of the structured endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Filename declared by the client.
    pub filename: String,
    /// MIME type the upload was classified by.
    pub file_type: String,
    /// Free-text summary.
    pub summary: String,
    /// Ordered key points; may be empty.
    pub key_points: Vec<String>,
    /// Word count reported by the model.
    pub word_count: u64,
}
