//! Outline entries exchanged between the analyzer and the panel.

use serde::{Deserialize, Serialize};

/// Shallowest heading level (`h1`).
pub const MIN_LEVEL: u8 = 1;

/// Deepest heading level (`h6`).
pub const MAX_LEVEL: u8 = 6;

/// One heading extracted from a page.
///
/// Only plain data lives here. Element handles stay inside the page
/// analyzer and never cross the message boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Element id, unique within the page context.
    pub id: String,
    /// Normalized level in `1..=6`.
    pub level: u8,
    /// Trimmed heading text.
    pub title: String,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(id: impl Into<String>, level: u8, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            title: title.into(),
        }
    }

    /// Check whether a sequence of entries satisfies the level clamp:
    /// the first entry is level 1 and no entry is more than one level
    /// deeper than its predecessor.
    pub fn is_normalized(entries: &[OutlineEntry]) -> bool {
        let Some(first) = entries.first() else {
            return true;
        };
        if first.level != MIN_LEVEL {
            return false;
        }
        entries.windows(2).all(|pair| {
            let (prev, next) = (&pair[0], &pair[1]);
            (MIN_LEVEL..=MAX_LEVEL).contains(&next.level) && next.level <= prev.level + 1
        })
    }
}
