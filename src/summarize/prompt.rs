//! Fixed instruction templates sent to the model.

/// Instructions for the free-text endpoint; the document text is appended after `Text:`.
pub const TEXT_SUMMARY_INSTRUCTIONS: &str = "Summarize the following text in a concise, structured way:\n\
- Key points as bullets\n\
- Main ideas and conclusions\n\
- Keep it objective and accurate\n\
- Limit to 300-500 words";

/// Instructions for the structured endpoint.
pub const STRUCTURED_SUMMARY_INSTRUCTIONS: &str = "Summarize the provided document. Respond with a single JSON object containing exactly these keys:\n\
- \"summary\": a concise, objective summary of the main ideas and conclusions (at most 500 words)\n\
- \"key_points\": an array of short strings, one per key point, in document order\n\
- \"word_count\": the approximate number of words in the original document, as an integer";

/// Prompt for the free-text endpoint with the (already truncated) document inlined.
pub fn text_summary_prompt(text: &str) -> String {
    format!("{TEXT_SUMMARY_INSTRUCTIONS}\n\nText:\n{text}")
}

/// Prompt for the structured endpoint; `text` is `None` when the document travels as an attachment.
pub fn structured_summary_prompt(text: Option<&str>) -> String {
    match text {
        Some(text) => format!("{STRUCTURED_SUMMARY_INSTRUCTIONS}\n\nText:\n{text}"),
        None => STRUCTURED_SUMMARY_INSTRUCTIONS.to_string(),
    }
}
