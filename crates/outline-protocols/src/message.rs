//! Request/response contract between the panel and the page analyzer.
//!
//! Requests are a closed tagged union keyed by `action`. Anything the
//! analyzer does not recognise decodes to [`AnalyzerRequest::Unknown`] and is
//! answered with a structured failure rather than being dropped.

use serde::{Deserialize, Serialize};

use crate::outline::OutlineEntry;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// A request sent from the panel to the page analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AnalyzerRequest {
    /// Liveness probe: answered with `{success:true}` by any installed analyzer.
    Ping,
    /// Recompute the outline from the current document.
    AnalyzePage,
    /// Return the last computed outline without recomputing.
    GetOutline,
    /// Scroll to and highlight the element behind an outline entry.
    ScrollToElement {
        #[serde(rename = "itemData")]
        item_data: ItemData,
    },
    /// Any action this analyzer does not understand.
    #[serde(other)]
    Unknown,
}

impl AnalyzerRequest {
    /// Action name as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::AnalyzePage => "analyzePage",
            Self::GetOutline => "getOutline",
            Self::ScrollToElement { .. } => "scrollToElement",
            Self::Unknown => "unknown",
        }
    }

    /// Navigation request for an outline entry.
    pub fn scroll_to(entry: &OutlineEntry) -> Self {
        Self::ScrollToElement {
            item_data: ItemData::from(entry),
        }
    }
}

/// Navigation target. Only `id` is required; level and title travel along
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ItemData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: None,
            title: None,
        }
    }
}

impl From<&OutlineEntry> for ItemData {
    fn from(entry: &OutlineEntry) -> Self {
        Self {
            id: entry.id.clone(),
            level: Some(entry.level),
            title: Some(entry.title.clone()),
        }
    }
}

/// Machine-readable failure kind carried next to the human-readable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// An extraction was already running in this page context.
    InProgress,
    /// The navigation target is not in the document.
    NotFound,
    /// The request action was not recognised.
    UnknownAction,
    /// Any other failure inside the analyzer.
    Internal,
}

/// Structured result of every analyzer request.
///
/// Wire shape: `{success:true[, outline]}` or `{success:false, error[, code]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<OutlineEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl AnalyzerResponse {
    /// Bare success, used by `ping` and `scrollToElement`.
    pub fn ok() -> Self {
        Self {
            success: true,
            outline: None,
            error: None,
            code: None,
        }
    }

    /// Success carrying an outline.
    pub fn with_outline(outline: Vec<OutlineEntry>) -> Self {
        Self {
            outline: Some(outline),
            ..Self::ok()
        }
    }

    /// Structured failure.
    pub fn failure(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            success: false,
            outline: None,
            error: Some(error.into()),
            code: Some(code),
        }
    }

    /// Failure answer for an unrecognised action.
    pub fn unknown_action() -> Self {
        Self::failure(ErrorCode::UnknownAction, "Unknown action")
    }

    /// Whether this is the soft "already in progress" failure.
    pub fn is_in_progress(&self) -> bool {
        !self.success && self.code == Some(ErrorCode::InProgress)
    }

    /// Outline of a successful response, empty when absent.
    pub fn into_outline(self) -> Vec<OutlineEntry> {
        self.outline.unwrap_or_default()
    }
}
