//! Page context: the document, its viewport and highlight state.
//!
//! One context exists per open page. The host owns it behind a
//! [`SharedPage`] and the analyzer injected into that page works on it.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::dom::{Document, LayoutMetrics, NodeId, ViewportInfo};

/// Shared handle to a page context.
pub type SharedPage = Arc<RwLock<PageContext>>;

/// How a scroll is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
}

/// A scroll applied to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Default)]
struct HighlightState {
    generation: u64,
    element: Option<NodeId>,
}

#[derive(Debug)]
pub struct PageContext {
    url: String,
    document: Document,
    viewport: ViewportInfo,
    highlight: HighlightState,
    last_scroll: Option<ScrollRequest>,
}

impl PageContext {
    /// Parse `html` and lay it out for `viewport`.
    pub fn from_html(
        url: impl Into<String>,
        html: &str,
        metrics: &LayoutMetrics,
        viewport: ViewportInfo,
    ) -> Self {
        let mut document = Document::parse(html);
        document.estimate_layout(metrics);
        Self::new(url, document, viewport)
    }

    pub fn new(url: impl Into<String>, document: Document, viewport: ViewportInfo) -> Self {
        Self {
            url: url.into(),
            document,
            viewport,
            highlight: HighlightState::default(),
            last_scroll: None,
        }
    }

    pub fn shared(self) -> SharedPage {
        Arc::new(RwLock::new(self))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Document `<title>`.
    pub fn title(&self) -> Option<String> {
        self.document.title()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn viewport(&self) -> &ViewportInfo {
        &self.viewport
    }

    /// The most recent scroll applied to the viewport.
    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    /// Element currently carrying the highlight, if any.
    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlight.element
    }

    /// Vertical offset that centers `node` in the viewport, clamped to the
    /// scrollable range.
    pub fn center_scroll_target(&self, node: NodeId) -> f64 {
        let rect = self.document.bounds(node);
        let target = rect.y - self.viewport.height as f64 / 2.0 + rect.height / 2.0;
        let max = self.viewport.max_scroll_y(self.document.content_height());
        target.clamp(0.0, max)
    }

    /// Scroll so that `node` is centered.
    pub fn scroll_to_center(&mut self, node: NodeId, behavior: ScrollBehavior) -> ScrollRequest {
        let request = ScrollRequest {
            top: self.center_scroll_target(node),
            behavior,
        };
        self.viewport.scroll_y = request.top;
        self.last_scroll = Some(request);
        request
    }

    /// Move the highlight class onto `node`. Every other element loses it.
    /// Returns the generation a later [`clear_highlight`] must present.
    ///
    /// [`clear_highlight`]: PageContext::clear_highlight
    pub fn apply_highlight(&mut self, node: NodeId, class: &str) -> u64 {
        for element in self.document.elements_with_class(class) {
            self.document.remove_class(element, class);
        }
        if let Some(previous) = self.highlight.element.take() {
            self.document.remove_class(previous, class);
        }
        self.document.add_class(node, class);

        self.highlight.generation += 1;
        self.highlight.element = Some(node);
        self.highlight.generation
    }

    /// Remove the highlight applied at `generation`. Returns false when a
    /// newer highlight replaced it.
    pub fn clear_highlight(&mut self, node: NodeId, class: &str, generation: u64) -> bool {
        if self.highlight.generation != generation || self.highlight.element != Some(node) {
            return false;
        }
        self.document.remove_class(node, class);
        self.highlight.element = None;
        true
    }
}
