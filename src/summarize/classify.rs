//! Content classification, decoding, and truncation of uploads.

use super::types::{SummarizeError, UploadedFile};
use crate::generation::Attachment;
use mime_guess::Mime;

/// Image MIME types forwarded to the model as binary attachments.
pub const IMAGE_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];
/// PDF MIME type forwarded as a binary attachment.
pub const PDF_MIME_TYPE: &str = "application/pdf";
/// Only extension accepted by the text-only endpoint.
pub const TEXT_EXTENSION: &str = "txt";

/// Upload content after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedContent {
    /// Decoded (and possibly truncated) text.
    Text(String),
    /// PDF bytes with their MIME type.
    Pdf(Attachment),
    /// Image bytes with their MIME type.
    Image(Attachment),
}

impl ClassifiedContent {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Pdf(_) => "pdf",
            Self::Image(_) => "image",
        }
    }
}

/// Classify by declared MIME type.
///
/// Images and PDFs pass through untouched. Everything else is decoded as UTF-8 with invalid
/// sequences replaced and cut to `max_chars` characters.
pub fn classify_by_mime(file: UploadedFile, max_chars: usize) -> ClassifiedContent {
    let mime = file.content_type.as_deref().and_then(mime_essence);
    match mime.as_deref() {
        Some(mime) if IMAGE_MIME_TYPES.contains(&mime) => ClassifiedContent::Image(Attachment {
            mime_type: mime.to_string(),
            data: file.data,
        }),
        Some(PDF_MIME_TYPE) => ClassifiedContent::Pdf(Attachment {
            mime_type: PDF_MIME_TYPE.to_string(),
            data: file.data,
        }),
        _ => {
            let text = String::from_utf8_lossy(&file.data);
            ClassifiedContent::Text(truncate_chars(&text, max_chars).to_string())
        }
    }
}

/// Lower-cased text after the last `.` of the filename (the whole name when there is no dot).
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Accept `.txt` uploads only and decode them strictly.
///
/// Returns the full decoded text; blank text is rejected.
pub fn decode_text_upload(file: &UploadedFile) -> Result<String, SummarizeError> {
    let extension = file_extension(&file.filename);
    if extension != TEXT_EXTENSION {
        return Err(SummarizeError::UnsupportedFileType(extension));
    }
    let text = std::str::from_utf8(&file.data)?;
    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyContent);
    }
    Ok(text.to_string())
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// `type/subtype` of a declared content type, without parameters. `None` when unparseable.
pub fn mime_essence(raw: &str) -> Option<String> {
    raw.trim()
        .parse::<Mime>()
        .ok()
        .map(|mime| mime.essence_str().to_ascii_lowercase())
}
