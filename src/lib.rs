#![deny(missing_docs)]

//! Core library for the Gemini file summarizer.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Generative-language client abstraction and the Gemini adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload classification, prompting, and reply normalization.
pub mod summarize;
