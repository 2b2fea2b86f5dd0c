//! Coarse block-flow geometry estimate.
//!
//! There is no rendering engine behind a page context, so element boxes are
//! estimated: every visible text run is laid out as full-width lines of a
//! fixed height, stacked top to bottom in document order, and an element
//! spans the lines of its descendants. This is enough to center an element
//! in the viewport.

use super::document::{Document, NodeId};
use super::dom_types::BoundingBox;

const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "template", "noscript", "title"];

/// Line metrics used by [`Document::estimate_layout`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutMetrics {
    pub width: f64,
    pub line_height: f64,
    pub chars_per_line: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            width: 1280.0,
            line_height: 24.0,
            chars_per_line: 80,
        }
    }
}

enum Visit {
    Enter(NodeId),
    Exit(NodeId, f64),
}

impl Document {
    /// Assign a bounding box to every attached node.
    pub fn estimate_layout(&mut self, metrics: &LayoutMetrics) {
        let chars_per_line = metrics.chars_per_line.max(1);
        let mut cursor = 0.0_f64;
        let mut visits = vec![Visit::Enter(self.root())];

        while let Some(visit) = visits.pop() {
            match visit {
                Visit::Enter(node) => {
                    if self.tag(node).is_some_and(|tag| HIDDEN_ELEMENTS.contains(&tag)) {
                        let bounds = BoundingBox {
                            x: 0.0,
                            y: cursor,
                            width: 0.0,
                            height: 0.0,
                        };
                        self.set_bounds(node, bounds);
                        continue;
                    }
                    if let Some(text) = self.text(node) {
                        let chars = text.trim().chars().count();
                        let lines = chars.div_ceil(chars_per_line);
                        let height = lines as f64 * metrics.line_height;
                        let bounds = BoundingBox {
                            x: 0.0,
                            y: cursor,
                            width: metrics.width,
                            height,
                        };
                        self.set_bounds(node, bounds);
                        cursor += height;
                        continue;
                    }
                    visits.push(Visit::Exit(node, cursor));
                    let children: Vec<NodeId> = self.children(node).to_vec();
                    visits.extend(children.into_iter().rev().map(Visit::Enter));
                }
                Visit::Exit(node, start) => {
                    let bounds = BoundingBox {
                        x: 0.0,
                        y: start,
                        width: metrics.width,
                        height: cursor - start,
                    };
                    self.set_bounds(node, bounds);
                }
            }
        }
    }
}
