//! Page analyzer errors.

use outline_protocols::{AnalyzerResponse, ErrorCode};
use thiserror::Error;

/// Failures of analyzer operations. Each maps onto a structured
/// `{success:false, error, code}` response.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// An extraction is already running in this page context.
    #[error("Analysis already in progress")]
    AnalysisInProgress,

    /// No attached element carries the requested id.
    #[error("Could not find element: {0}")]
    ElementNotFound(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl AnalyzerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AnalysisInProgress => ErrorCode::InProgress,
            Self::ElementNotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn into_response(self) -> AnalyzerResponse {
        AnalyzerResponse::failure(self.code(), self.to_string())
    }
}

/// Failures of the main-content extractor. Never surfaced to the panel:
/// the analyzer falls back to scanning the whole page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Content extraction failed: {0}")]
    Failed(String),

    #[error("Document not supported: {0}")]
    Unsupported(String),
}
