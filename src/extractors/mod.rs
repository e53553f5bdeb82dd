// src/extractors/mod.rs
pub mod text;

// Re-export key extraction types for convenience
pub use text::{extract_text, is_document_url, FilingText, DEFAULT_MAX_CHARS};
