//! Extension host interface consumed by the panel controller.

use async_trait::async_trait;

use crate::error::HostError;
use crate::message::{AnalyzerRequest, AnalyzerResponse};
use crate::page::{PageId, PageIdentity};

/// Primitives the browser offers to the panel.
///
/// Every method is a suspension point; callers treat a returned error the
/// same way as a structured failure from the analyzer.
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    /// The active page of the current window, if any.
    async fn query_active_page(&self) -> Result<Option<PageIdentity>, HostError>;

    /// Install the page analyzer into a page context.
    async fn inject_analyzer(&self, page: PageId) -> Result<(), HostError>;

    /// Send a request to the analyzer of a page and await its response.
    async fn send_message(
        &self,
        page: PageId,
        request: AnalyzerRequest,
    ) -> Result<AnalyzerResponse, HostError>;

    /// Whether the extension may read `file://` pages.
    async fn is_file_scheme_access_allowed(&self) -> Result<bool, HostError>;

    /// Show the side panel for a page.
    async fn open_panel(&self, page: PageId) -> Result<(), HostError>;
}
