//! Gemini REST adapter for [`GenerationClient`].
//!
//! Issues `models/{model}:generateContent` requests directly with `reqwest`. Binary attachments
//! travel as base64 `inlineData` parts ahead of the prompt text.

use super::{
    Attachment, GenerationClient, GenerationError, GenerationOptions, GenerationRequest,
    ResponseFormat,
};
use crate::config::{Config, ConfigError};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Gemini-backed generation client.
///
/// Holds only the credential, base URL, and a pooled HTTP client, so one instance is shared by
/// every request.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.gemini_api_base, &config.gemini_api_key)
    }

    /// Build a client for the given API base and credential.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingVariable("GEMINI_API_KEY".into()));
        }
        let http = Client::builder()
            .user_agent("gemini-summarizer")
            .build()
            .map_err(|error| ConfigError::HttpClient(error.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

impl From<&GenerationOptions> for GenerationConfig {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            response_mime_type: match options.response_format {
                ResponseFormat::Json => Some("application/json"),
                ResponseFormat::FreeText => None,
            },
        }
    }
}

impl From<Attachment> for Part {
    fn from(attachment: Attachment) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: attachment.mime_type,
                data: STANDARD.encode(attachment.data),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate: its first part for free text, every text part joined for
    /// JSON, which may arrive split across parts.
    fn into_text(self, format: ResponseFormat) -> Result<String, GenerationError> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        match format {
            ResponseFormat::FreeText => parts.into_iter().next().and_then(|part| part.text),
            ResponseFormat::Json => {
                let texts: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
                (!texts.is_empty()).then(|| texts.concat())
            }
        }
        .ok_or(GenerationError::NoContent)
    }
}

fn build_payload(request: GenerationRequest) -> GenerateContentRequest {
    let generation_config = GenerationConfig::from(&request.options);
    let mut parts = Vec::with_capacity(2);
    if let Some(attachment) = request.attachment {
        parts.push(Part::from(attachment));
    }
    parts.push(Part::Text {
        text: request.prompt,
    });
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config,
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let endpoint = self.endpoint(&request.model);
        let format = request.options.response_format;
        tracing::debug!(
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            attachment_mime = request.attachment.as_ref().map(|a| a.mime_type.as_str()),
            format = ?request.options.response_format,
            "Sending generateContent request"
        );
        let payload = build_payload(request);

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationError::Unavailable(format!(
                    "failed to reach Gemini at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Unauthorized(format!("{status}: {body}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::GenerationFailed(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode Gemini response: {error}"))
        })?;

        body.into_text(format)
    }
}
