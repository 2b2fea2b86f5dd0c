//! Main-content extraction collaborator.
//!
//! The analyzer hands a serialized copy of the page to a
//! [`ContentExtractor`] and scans the returned fragment instead of the whole
//! page. A failure or an empty answer makes the analyzer fall back to the
//! live document.

use std::sync::LazyLock;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

/// Opaque main-content extraction algorithm.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Return the HTML of the main content of `document_html`, or `None` when
    /// no main content could be isolated.
    async fn extract(&self, document_html: &str) -> Result<Option<String>, ExtractError>;
}

static LANDMARKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"article, main, [role="main"]"#).expect("landmark selector"));

/// Picks the landmark (`article`, `main` or `[role=main]`) carrying the most
/// text. Pages without landmarks yield `None`.
#[derive(Debug, Clone, Default)]
pub struct LandmarkExtractor {
    /// Landmarks with less visible text than this are ignored.
    pub min_text_chars: usize,
}

impl LandmarkExtractor {
    pub fn new() -> Self {
        Self { min_text_chars: 1 }
    }

    fn pick(&self, document_html: &str) -> Result<Option<String>, ExtractError> {
        if document_html.trim().is_empty() {
            return Err(ExtractError::Unsupported("empty document".to_string()));
        }
        let parsed = Html::parse_document(document_html);

        let best = parsed
            .select(&LANDMARKS)
            .map(|element| (text_len(&element), element))
            .filter(|(len, _)| *len >= self.min_text_chars.max(1))
            .fold(None::<(usize, ElementRef<'_>)>, |best, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            });

        Ok(best.map(|(_, element)| element.inner_html()))
    }
}

fn text_len(element: &ElementRef<'_>) -> usize {
    element.text().map(|t| t.trim().chars().count()).sum()
}

#[async_trait]
impl ContentExtractor for LandmarkExtractor {
    async fn extract(&self, document_html: &str) -> Result<Option<String>, ExtractError> {
        self.pick(document_html)
    }
}
