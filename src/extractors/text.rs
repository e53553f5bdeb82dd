// src/extractors/text.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, Html};

// --- Constants ---
pub const DEFAULT_MAX_CHARS: usize = 5_000;

// Elements whose text is never document content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "title", "noscript"];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq)]
pub struct FilingText {
    pub content: String,        // Whitespace-collapsed text, at most `max_chars` chars
    pub total_chars: usize,     // Length before truncation
}

impl FilingText {
    pub fn is_truncated(&self) -> bool {
        self.content.chars().count() < self.total_chars
    }
}

/// Plain text of a filing document (HTML or plain text), whitespace collapsed
/// and cut to `max_chars` characters.
pub fn extract_text(document: &str, max_chars: usize) -> FilingText {
    let html = Html::parse_document(document);

    let mut raw = String::new();
    for node in html.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !skipped {
            raw.push_str(&text.text);
            raw.push(' ');
        }
    }

    let collapsed = WHITESPACE_RE.replace_all(&raw, " ");
    let collapsed = collapsed.trim();
    let total_chars = collapsed.chars().count();
    let content: String = collapsed.chars().take(max_chars).collect();

    tracing::debug!("Extracted {} chars of text (kept {})", total_chars, content.chars().count());
    FilingText { content, total_chars }
}

/// Filing documents are addressed by absolute URL.
pub fn is_document_url(input: &str) -> bool {
    let input = input.trim();
    input.starts_with("https://") || input.starts_with("http://")
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markup_and_scripts() {
        let html = r#"
            <!DOCTYPE html>
            <html><head><title>aapl-20240928</title><style>p { color: red; }</style></head><body>
            <h2>Item 8. Financial   Statements</h2>
            <script>var x = 1;</script>
            <p>Net&nbsp;sales
               increased.</p>
            <table><tr><td>Assets</td><td>364,980</td></tr></table>
            </body></html>
        "#;
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert_eq!(text.content, "Item 8. Financial Statements Net sales increased. Assets 364,980");
        assert!(!text.is_truncated());
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let html = "<p>Ünïcödé text that goes on</p>";
        let text = extract_text(html, 7);
        assert_eq!(text.content, "Ünïcödé");
        assert!(text.is_truncated());
        assert_eq!(text.total_chars, "Ünïcödé text that goes on".chars().count());
    }

    #[test]
    fn test_plain_text_document() {
        let text = extract_text("UNITED STATES\nSECURITIES AND EXCHANGE COMMISSION\n\nFORM 8-K", 100);
        assert_eq!(text.content, "UNITED STATES SECURITIES AND EXCHANGE COMMISSION FORM 8-K");
    }

    #[test]
    fn test_document_url() {
        assert!(is_document_url("https://www.sec.gov/Archives/edgar/data/320193/x.htm"));
        assert!(!is_document_url("0000320193-24-000123"));
    }
}
