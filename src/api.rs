//! HTTP surface for the summarizer.
//!
//! - `POST /summarize`, `POST /v2/summarize` – Summarize a text, PDF, or image upload into
//!   `{ filename, file_type, summary, key_points, word_count }`. Uploads above 10 MiB are rejected.
//! - `POST /v1/summarize` – Summarize a `.txt` upload into `{ summary }`.
//! - `GET /health`, `GET /` – Liveness check returning `{ "status": "ok" }`.
//!
//! Uploads are `multipart/form-data` with the document in a field named `file`. Failures are
//! returned as `{ "detail": "..." }` with `400` for client errors and `500` otherwise.

use crate::config::Config;
use crate::summarize::{
    MAX_UPLOAD_BYTES, SummarizeApi, SummarizeError, SummaryResult, TextSummary, UploadedFile,
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Instrument;
use uuid::Uuid;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the summarize API surface.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: SummarizeApi + 'static,
{
    // The structured route enforces its own cap while streaming the upload.
    let structured = post(summarize_structured::<S>).layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/summarize", structured.clone())
        .route("/v2/summarize", structured)
        .route(
            "/v1/summarize",
            post(summarize_text::<S>).layer(DefaultBodyLimit::max(config.upload_body_limit)),
        )
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(origin = %origin, %error, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Response body for the liveness check.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Report liveness. Never touches the generation provider.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Summarize a `.txt` upload into free text.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<TextSummary>, AppError>
where
    S: SummarizeApi,
{
    let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4(), endpoint = "v1");
    async move {
        let file = read_upload(multipart, None).await?;
        log_upload(&file);
        let summary = service.summarize_text(file).await?;
        tracing::info!(
            summary_chars = summary.summary.chars().count(),
            "Summarize request completed"
        );
        Ok(Json(summary))
    }
    .instrument(span)
    .await
}

/// Summarize a text, PDF, or image upload into a structured result.
async fn summarize_structured<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<SummaryResult>, AppError>
where
    S: SummarizeApi,
{
    let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4(), endpoint = "v2");
    async move {
        let file = read_upload(multipart, Some(MAX_UPLOAD_BYTES)).await?;
        log_upload(&file);
        let result = service.summarize_structured(file).await?;
        tracing::info!(
            file_type = %result.file_type,
            key_points = result.key_points.len(),
            word_count = result.word_count,
            "Summarize request completed"
        );
        Ok(Json(result))
    }
    .instrument(span)
    .await
}

/// Read the `file` field, failing as soon as more than `limit` bytes have arrived.
async fn read_upload(
    mut multipart: Multipart,
    limit: Option<usize>,
) -> Result<UploadedFile, SummarizeError> {
    while let Some(mut field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(invalid_upload)? {
            if let Some(limit) = limit {
                if data.len() + chunk.len() > limit {
                    tracing::warn!(filename = %filename, limit, "Upload exceeded size cap");
                    return Err(SummarizeError::PayloadTooLarge { limit });
                }
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Err(SummarizeError::MissingFile)
}

fn invalid_upload(error: MultipartError) -> SummarizeError {
    SummarizeError::InvalidUpload(error.body_text())
}

fn log_upload(file: &UploadedFile) {
    tracing::info!(
        filename = %file.filename,
        content_type = ?file.content_type,
        bytes = file.data.len(),
        sha256 = %file.fingerprint(),
        "Received upload"
    );
}

struct AppError(SummarizeError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            tracing::warn!(error = %self.0, "Rejected summarize request");
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Summarize request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

impl From<SummarizeError> for AppError {
    fn from(inner: SummarizeError) -> Self {
        Self(inner)
    }
}
