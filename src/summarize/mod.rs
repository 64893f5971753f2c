//! Summarize pipeline: upload classification, prompt construction, and reply normalization.

pub mod classify;
pub mod prompt;
mod reply;
mod service;
pub mod types;

pub use reply::{StructuredReply, parse_structured_reply};
pub use service::{
    STRUCTURED_TEXT_CHAR_LIMIT, SummarizeApi, SummarizeService, TEXT_PROMPT_CHAR_LIMIT,
};
pub use types::{
    FALLBACK_MIME, MAX_UPLOAD_BYTES, SummarizeError, SummaryResult, TextSummary, UploadedFile,
};
