//! Shared geometry types: viewport and bounding box.

use serde::{Deserialize, Serialize};

/// Viewport of a page context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportInfo {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Scroll Y offset.
    pub scroll_y: f64,
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            scroll_y: 0.0,
        }
    }
}

impl ViewportInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Largest vertical scroll offset for a document of `content_height`.
    pub fn max_scroll_y(&self, content_height: f64) -> f64 {
        (content_height - self.height as f64).max(0.0)
    }
}

/// Bounding box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
