//! Abstractions over the generative-language API that writes the summaries.
//!
//! The summarize pipeline only ever talks to [`GenerationClient`]; the Gemini REST adapter in
//! [`gemini`] is the production implementation and tests substitute their own stubs.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Errors surfaced while asking the provider for a completion.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Provider rejected the configured credential.
    #[error("Gemini rejected the API credential: {0}")]
    Unauthorized(String),
    /// Provider could not be reached.
    #[error("Failed to reach Gemini: {0}")]
    Unavailable(String),
    /// Provider returned an error response.
    #[error("Gemini returned an error: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed Gemini response: {0}")]
    InvalidResponse(String),
    /// Provider answered without any candidate or content part.
    #[error("Gemini returned no candidates or content parts")]
    NoContent,
}

/// Output format requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text.
    FreeText,
    /// A single JSON document.
    Json,
}

/// Binary payload sent next to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Raw file bytes.
    pub data: Vec<u8>,
    /// Declared MIME type of `data`.
    pub mime_type: String,
}

/// Sampling and formatting options for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Output format the provider should produce.
    pub response_format: ResponseFormat,
    /// Sampling temperature; `None` keeps the provider default.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens; `None` keeps the provider default.
    pub max_output_tokens: Option<u32>,
}

/// Request payload passed to the provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Instruction text (with any inlined document text).
    pub prompt: String,
    /// Optional binary document to summarize.
    pub attachment: Option<Attachment>,
    /// Output options.
    pub options: GenerationOptions,
}

/// Interface implemented by generative-language providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for the request, returning the first text part of the first candidate.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
