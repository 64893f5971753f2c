//! Summarize service coordinating classification, prompting, and the generation call.

use super::{
    classify::{ClassifiedContent, classify_by_mime, decode_text_upload, truncate_chars},
    prompt::{structured_summary_prompt, text_summary_prompt},
    reply::parse_structured_reply,
    types::{MAX_UPLOAD_BYTES, SummarizeError, SummaryResult, TextSummary, UploadedFile},
};
use crate::generation::{
    GenerationClient, GenerationError, GenerationOptions, GenerationRequest, ResponseFormat,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Characters of text inlined into the free-text prompt.
pub const TEXT_PROMPT_CHAR_LIMIT: usize = 20_000;
/// Characters of text kept for the structured endpoint.
pub const STRUCTURED_TEXT_CHAR_LIMIT: usize = 50_000;
/// Sampling temperature for free-text summaries.
pub const TEXT_SUMMARY_TEMPERATURE: f32 = 0.3;
/// Output token cap for free-text summaries.
pub const TEXT_SUMMARY_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Abstraction over the summarize pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Summarize a `.txt` upload into free text (`/v1`).
    async fn summarize_text(&self, file: UploadedFile) -> Result<TextSummary, SummarizeError>;

    /// Summarize a text, PDF, or image upload into a structured result (`/v2`).
    async fn summarize_structured(
        &self,
        file: UploadedFile,
    ) -> Result<SummaryResult, SummarizeError>;
}

/// Turns uploads into summaries using a shared generation client.
///
/// Holds no per-request state; construct once at startup and share it through an `Arc`.
pub struct SummarizeService {
    client: Arc<dyn GenerationClient>,
    model: String,
}

impl SummarizeService {
    /// Build a service that calls `model` through `client`.
    pub fn new(client: Arc<dyn GenerationClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SummarizeApi for SummarizeService {
    async fn summarize_text(&self, file: UploadedFile) -> Result<TextSummary, SummarizeError> {
        let text = decode_text_upload(&file)?;
        let inlined = truncate_chars(&text, TEXT_PROMPT_CHAR_LIMIT);
        tracing::debug!(
            filename = %file.filename,
            chars = text.chars().count(),
            truncated = inlined.len() < text.len(),
            "Decoded text upload"
        );

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: text_summary_prompt(inlined),
            attachment: None,
            options: GenerationOptions {
                response_format: ResponseFormat::FreeText,
                temperature: Some(TEXT_SUMMARY_TEMPERATURE),
                max_output_tokens: Some(TEXT_SUMMARY_MAX_OUTPUT_TOKENS),
            },
        };

        let summary = match self.client.generate(request).await {
            Ok(text) => text.trim().to_string(),
            Err(GenerationError::NoContent) => return Err(SummarizeError::NoSummaryGenerated),
            Err(other) => return Err(other.into()),
        };
        Ok(TextSummary { summary })
    }

    async fn summarize_structured(
        &self,
        file: UploadedFile,
    ) -> Result<SummaryResult, SummarizeError> {
        if file.data.len() > MAX_UPLOAD_BYTES {
            return Err(SummarizeError::PayloadTooLarge {
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let filename = file.filename.clone();
        let file_type = file.mime_type().to_string();
        let content = classify_by_mime(file, STRUCTURED_TEXT_CHAR_LIMIT);
        tracing::debug!(filename = %filename, file_type = %file_type, kind = content.kind(), "Classified upload");

        let (prompt, attachment) = match content {
            ClassifiedContent::Text(text) => (structured_summary_prompt(Some(&text)), None),
            ClassifiedContent::Pdf(attachment) | ClassifiedContent::Image(attachment) => {
                (structured_summary_prompt(None), Some(attachment))
            }
        };

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            attachment,
            options: GenerationOptions {
                response_format: ResponseFormat::Json,
                temperature: None,
                max_output_tokens: None,
            },
        };

        let raw = self.client.generate(request).await?;
        let reply = parse_structured_reply(&raw)?;
        Ok(SummaryResult {
            filename,
            file_type,
            summary: reply.summary,
            key_points: reply.key_points,
            word_count: reply.word_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Attachment;
    use crate::summarize::prompt::STRUCTURED_SUMMARY_INSTRUCTIONS;
    use tokio::sync::Mutex;

    struct StubGenerationClient {
        reply: Mutex<Option<Result<String, GenerationError>>>,
        calls: Mutex<Vec<GenerationRequest>>,
    }

    impl StubGenerationClient {
        fn replying(reply: Result<String, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            })
        }

        async fn recorded_calls(&self) -> Vec<GenerationRequest> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl GenerationClient for StubGenerationClient {
        async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
            self.calls.lock().await.push(request);
            self.reply
                .lock()
                .await
                .take()
                .unwrap_or(Err(GenerationError::NoContent))
        }
    }

    fn upload(filename: &str, content_type: Option<&str>, data: Vec<u8>) -> UploadedFile {
        UploadedFile {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            data,
        }
    }

    #[tokio::test]
    async fn text_summary_uses_free_text_options() {
        let stub = StubGenerationClient::replying(Ok("  A short greeting.\n".into()));
        let service = SummarizeService::new(stub.clone(), "gemini-2.5-flash");

        let summary = service
            .summarize_text(upload("notes.txt", Some("text/plain"), b"Hello world.".to_vec()))
            .await
            .expect("summary");
        assert_eq!(summary.summary, "A short greeting.");

        let calls = stub.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.model, "gemini-2.5-flash");
        assert!(call.prompt.ends_with("Text:\nHello world."));
        assert!(call.attachment.is_none());
        assert_eq!(call.options.response_format, ResponseFormat::FreeText);
        assert_eq!(call.options.temperature, Some(0.3));
        assert_eq!(call.options.max_output_tokens, Some(2048));
    }

    #[tokio::test]
    async fn text_summary_inlines_first_twenty_thousand_chars() {
        let stub = StubGenerationClient::replying(Ok("ok".into()));
        let service = SummarizeService::new(stub.clone(), "m");
        let body = "a".repeat(TEXT_PROMPT_CHAR_LIMIT) + &"b".repeat(100);

        service
            .summarize_text(upload("big.txt", None, body.into_bytes()))
            .await
            .expect("summary");

        let prompt = &stub.recorded_calls().await[0].prompt;
        let inlined = prompt.rsplit("Text:\n").next().expect("text section");
        assert_eq!(inlined.len(), TEXT_PROMPT_CHAR_LIMIT);
        assert!(!inlined.contains('b'));
    }

    #[tokio::test]
    async fn text_summary_without_parts_is_reported() {
        let stub = StubGenerationClient::replying(Err(GenerationError::NoContent));
        let service = SummarizeService::new(stub, "m");

        let error = service
            .summarize_text(upload("notes.txt", None, b"Hello".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(error, SummarizeError::NoSummaryGenerated));
    }

    #[tokio::test]
    async fn text_validation_happens_before_the_call() {
        let stub = StubGenerationClient::replying(Ok("unused".into()));
        let service = SummarizeService::new(stub.clone(), "m");

        let error = service
            .summarize_text(upload("image.png", Some("image/png"), vec![1, 2, 3]))
            .await
            .unwrap_err();
        assert!(matches!(error, SummarizeError::UnsupportedFileType(_)));

        let error = service
            .summarize_text(upload("notes.txt", None, b"   ".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(error, SummarizeError::EmptyContent));

        assert!(stub.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn structured_summary_maps_reply_fields() {
        let stub = StubGenerationClient::replying(Ok(
            r#"{"summary": "Quarterly results.", "key_points": ["Revenue up", "Costs flat"], "word_count": 812}"#
                .into(),
        ));
        let service = SummarizeService::new(stub.clone(), "m");

        let result = service
            .summarize_structured(upload("q3.txt", Some("text/plain"), b"Revenue grew.".to_vec()))
            .await
            .expect("result");

        assert_eq!(
            result,
            SummaryResult {
                filename: "q3.txt".into(),
                file_type: "text/plain".into(),
                summary: "Quarterly results.".into(),
                key_points: vec!["Revenue up".into(), "Costs flat".into()],
                word_count: 812,
            }
        );
        let call = &stub.recorded_calls().await[0];
        assert_eq!(call.options.response_format, ResponseFormat::Json);
        assert_eq!(call.options.temperature, None);
        assert_eq!(call.options.max_output_tokens, None);
    }

    #[tokio::test]
    async fn structured_summary_sends_pdf_as_attachment() {
        let stub = StubGenerationClient::replying(Ok(r#"{"summary": "x"}"#.into()));
        let service = SummarizeService::new(stub.clone(), "m");

        let result = service
            .summarize_structured(upload("paper.pdf", Some("application/pdf"), b"%PDF-1.4".to_vec()))
            .await
            .expect("result");
        assert_eq!(result.summary, "x");
        assert!(result.key_points.is_empty());
        assert_eq!(result.word_count, 0);

        let call = &stub.recorded_calls().await[0];
        assert_eq!(call.prompt, STRUCTURED_SUMMARY_INSTRUCTIONS);
        assert_eq!(
            call.attachment,
            Some(Attachment {
                data: b"%PDF-1.4".to_vec(),
                mime_type: "application/pdf".into()
            })
        );
    }

    #[tokio::test]
    async fn structured_summary_truncates_text_to_fifty_thousand_chars() {
        let stub = StubGenerationClient::replying(Ok("{}".into()));
        let service = SummarizeService::new(stub.clone(), "m");
        let body: String = "é".repeat(60_000);

        service
            .summarize_structured(upload("long.txt", Some("text/plain"), body.clone().into_bytes()))
            .await
            .expect("result");

        let prompt = &stub.recorded_calls().await[0].prompt;
        let sent = prompt.rsplit("Text:\n").next().expect("text section");
        assert_eq!(sent.chars().count(), STRUCTURED_TEXT_CHAR_LIMIT);
        assert_eq!(sent, truncate_chars(&body, STRUCTURED_TEXT_CHAR_LIMIT));
    }

    #[tokio::test]
    async fn structured_summary_rejects_oversized_upload() {
        let stub = StubGenerationClient::replying(Ok("{}".into()));
        let service = SummarizeService::new(stub.clone(), "m");

        let error = service
            .summarize_structured(upload("huge.bin", None, vec![b'a'; MAX_UPLOAD_BYTES + 1]))
            .await
            .unwrap_err();
        assert!(matches!(error, SummarizeError::PayloadTooLarge { .. }));
        assert!(stub.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn structured_summary_reports_malformed_json() {
        let stub = StubGenerationClient::replying(Ok("Sure! Here's a summary.".into()));
        let service = SummarizeService::new(stub, "m");

        let error = service
            .summarize_structured(upload("a.txt", None, b"text".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(error, SummarizeError::MalformedReply(_)));
        assert!(!error.is_client_error());
    }
}
