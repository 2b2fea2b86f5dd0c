//! The page analyzer: one instance per page context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use outline_config::AnalyzerConfig;
use outline_protocols::{AnalyzerRequest, AnalyzerResponse, OutlineEntry};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::dom::{Document, NodeId};
use crate::error::AnalyzerError;
use crate::extractor::ContentExtractor;
use crate::outline::{normalize_levels, AnalyzedHeading, HeadingScan, IdGenerator};
use crate::page::{ScrollBehavior, ScrollRequest, SharedPage};

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;

/// Marks an extraction as running; the flag drops back on every exit path.
struct AnalysisGuard<'a>(&'a AtomicBool);

impl<'a> AnalysisGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn highlight_css(class: &str) -> String {
    format!(
        ".{} {{\n  background-color: rgba(59, 130, 246, 0.2) !important;\n  border-radius: 4px !important;\n  transition: background-color 2s ease;\n}}\n",
        class
    )
}

/// Extracts outlines from its page context and navigates within it.
pub struct PageAnalyzer {
    page: SharedPage,
    extractor: Option<Arc<dyn ContentExtractor>>,
    config: AnalyzerConfig,
    analyzing: AtomicBool,
    outline: Mutex<Vec<AnalyzedHeading>>,
    sequence: AtomicU64,
}

impl PageAnalyzer {
    /// Create an analyzer scanning the whole page.
    pub fn new(page: SharedPage, config: AnalyzerConfig) -> Self {
        Self {
            page,
            extractor: None,
            config,
            analyzing: AtomicBool::new(false),
            outline: Mutex::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Try `extractor` for the main content before scanning the whole page.
    pub fn with_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Last computed outline.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.outline.lock().iter().map(|h| h.entry.clone()).collect()
    }

    /// Last computed outline with element handles.
    pub fn analyzed_headings(&self) -> Vec<AnalyzedHeading> {
        self.outline.lock().clone()
    }

    /// Rebuild the outline from the current document.
    pub async fn extract_outline(&self) -> Result<Vec<OutlineEntry>, AnalyzerError> {
        let _guard =
            AnalysisGuard::acquire(&self.analyzing).ok_or(AnalyzerError::AnalysisInProgress)?;

        let fragment = self.main_content().await;
        let from_fragment = fragment.is_some();

        let scan = HeadingScan {
            min_title_chars: self.config.min_title_chars,
            ids: IdGenerator {
                prefix: &self.config.id_prefix,
                sequence: &self.sequence,
            },
        };
        let mut headings = {
            let mut page = self.page.write();
            match fragment {
                Some(mut fragment) => scan.scan_fragment(page.document_mut(), &mut fragment),
                None => scan.scan_live(page.document_mut()),
            }
        };

        let mut entries: Vec<OutlineEntry> = headings.iter().map(|h| h.entry.clone()).collect();
        normalize_levels(&mut entries);
        for (heading, entry) in headings.iter_mut().zip(&entries) {
            heading.entry.level = entry.level;
        }

        info!(
            "Extracted {} outline entries from {}",
            entries.len(),
            if from_fragment { "main content" } else { "full page" }
        );
        *self.outline.lock() = headings;
        Ok(entries)
    }

    async fn main_content(&self) -> Option<Document> {
        if !self.config.use_main_content {
            return None;
        }
        let extractor = self.extractor.as_ref()?;
        let html = self.page.read().document().to_html();

        match extractor.extract(&html).await {
            Ok(Some(fragment)) if !fragment.trim().is_empty() => {
                Some(Document::parse_fragment(&fragment))
            }
            Ok(_) => {
                debug!("No main content isolated, scanning the whole page");
                None
            }
            Err(e) => {
                warn!("Main content extraction failed, scanning the whole page: {}", e);
                None
            }
        }
    }

    /// Scroll the element carrying `entry_id` to the viewport center and
    /// highlight it for the configured duration.
    pub fn locate_and_focus(&self, entry_id: &str) -> Result<ScrollRequest, AnalyzerError> {
        let (node, scroll, generation) = {
            let mut page = self.page.write();
            let node = page
                .document()
                .get_element_by_id(entry_id)
                .ok_or_else(|| AnalyzerError::ElementNotFound(entry_id.to_string()))?;

            let scroll = page.scroll_to_center(node, ScrollBehavior::Smooth);
            let css = highlight_css(&self.config.highlight_class);
            page.document_mut()
                .ensure_style(&self.config.highlight_style_id, &css);
            let generation = page.apply_highlight(node, &self.config.highlight_class);
            (node, scroll, generation)
        };

        debug!("Focused '{}' at scroll offset {:.0}", entry_id, scroll.top);
        self.schedule_highlight_clear(node, generation);
        Ok(scroll)
    }

    fn schedule_highlight_clear(&self, node: NodeId, generation: u64) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No runtime available, highlight will not be cleared");
            return;
        };
        let page = Arc::clone(&self.page);
        let class = self.config.highlight_class.clone();
        let delay = self.config.highlight_duration();

        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if page.write().clear_highlight(node, &class, generation) {
                debug!("Highlight {} cleared", generation);
            }
        });
    }

    /// Answer one request of the message contract.
    pub async fn handle(&self, request: AnalyzerRequest) -> AnalyzerResponse {
        debug!(action = request.action(), "Analyzer request");

        match request {
            AnalyzerRequest::Ping => AnalyzerResponse::ok(),
            AnalyzerRequest::AnalyzePage => match self.extract_outline().await {
                Ok(outline) => AnalyzerResponse::with_outline(outline),
                Err(e) => {
                    warn!("Page analysis failed: {}", e);
                    e.into_response()
                }
            },
            AnalyzerRequest::GetOutline => AnalyzerResponse::with_outline(self.outline()),
            AnalyzerRequest::ScrollToElement { item_data } => {
                match self.locate_and_focus(&item_data.id) {
                    Ok(_) => AnalyzerResponse::ok(),
                    Err(e) => {
                        warn!("Navigation failed: {}", e);
                        e.into_response()
                    }
                }
            }
            AnalyzerRequest::Unknown => AnalyzerResponse::unknown_action(),
        }
    }

    /// Decode a JSON request, answer it and encode the response. Requests
    /// that do not decode are answered with an internal failure.
    pub async fn handle_json(&self, raw: &str) -> Result<String, serde_json::Error> {
        let response = match serde_json::from_str::<AnalyzerRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Malformed analyzer request: {}", e);
                AnalyzerError::Internal(format!("Malformed request: {}", e)).into_response()
            }
        };
        serde_json::to_string(&response)
    }
}
