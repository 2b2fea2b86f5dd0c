//! In-memory browser: tabs, analyzer injection and message routing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use outline_analyzer::{
    ContentExtractor, LayoutMetrics, PageAnalyzer, PageContext, SharedPage, ViewportInfo,
};
use outline_config::{AnalyzerConfig, Config, HostConfig};
use outline_protocols::{
    AnalyzerRequest, AnalyzerResponse, ExtensionHost, HostError, PageId, PageIdentity,
};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::channel::AnalyzerChannel;

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;

/// URL schemes no extension may script.
const PRIVILEGED_SCHEMES: &[&str] = &["chrome:", "chrome-extension:", "about:", "edge:"];

struct Tab {
    url: String,
    page: SharedPage,
    channel: Option<AnalyzerChannel>,
}

/// A browser window holding tabs backed by parsed HTML documents.
pub struct BrowserHost {
    config: HostConfig,
    analyzer_config: AnalyzerConfig,
    extractor: Option<Arc<dyn ContentExtractor>>,
    tabs: RwLock<HashMap<PageId, Tab>>,
    active: RwLock<Option<PageId>>,
    next_id: AtomicU64,
    file_scheme_access: AtomicBool,
    open_panels: RwLock<HashSet<PageId>>,
    injections: AtomicUsize,
}

impl BrowserHost {
    pub fn new(config: HostConfig, analyzer_config: AnalyzerConfig) -> Self {
        let file_scheme_access = config.file_scheme_access;
        Self {
            config,
            analyzer_config,
            extractor: None,
            tabs: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
            next_id: AtomicU64::new(1),
            file_scheme_access: AtomicBool::new(file_scheme_access),
            open_panels: RwLock::new(HashSet::new()),
            injections: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.host.clone(), config.analyzer.clone())
    }

    /// Main-content extractor handed to every injected analyzer.
    pub fn with_extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    fn load(&self, url: &str, html: &str) -> SharedPage {
        let metrics = LayoutMetrics {
            width: self.config.viewport_width as f64,
            line_height: self.config.line_height,
            chars_per_line: self.config.chars_per_line,
        };
        let viewport = ViewportInfo::new(self.config.viewport_width, self.config.viewport_height);
        PageContext::from_html(url, html, &metrics, viewport).shared()
    }

    /// Open a tab and make it active.
    pub fn open_tab(&self, url: impl Into<String>, html: &str) -> PageId {
        let url = url.into();
        let id = PageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let page = self.load(&url, html);

        info!("Opened {} at {}", id, url);
        self.tabs.write().insert(
            id,
            Tab {
                url,
                page,
                channel: None,
            },
        );
        *self.active.write() = Some(id);
        id
    }

    pub fn activate(&self, id: PageId) -> Result<(), HostError> {
        if !self.tabs.read().contains_key(&id) {
            return Err(HostError::PageNotFound(id));
        }
        *self.active.write() = Some(id);
        debug!("Activated {}", id);
        Ok(())
    }

    /// Load a new document into a tab. The old page context and its
    /// analyzer go away.
    pub fn navigate(&self, id: PageId, url: impl Into<String>, html: &str) -> Result<(), HostError> {
        let url = url.into();
        let page = self.load(&url, html);

        let mut tabs = self.tabs.write();
        let tab = tabs.get_mut(&id).ok_or(HostError::PageNotFound(id))?;
        info!("Navigated {} from {} to {}", id, tab.url, url);
        tab.url = url;
        tab.page = page;
        tab.channel = None;
        Ok(())
    }

    pub fn close_tab(&self, id: PageId) -> Result<(), HostError> {
        self.tabs
            .write()
            .remove(&id)
            .ok_or(HostError::PageNotFound(id))?;
        self.open_panels.write().remove(&id);

        let mut active = self.active.write();
        if *active == Some(id) {
            *active = None;
        }
        info!("Closed {}", id);
        Ok(())
    }

    /// Page context of a tab.
    pub fn page(&self, id: PageId) -> Option<SharedPage> {
        self.tabs.read().get(&id).map(|tab| Arc::clone(&tab.page))
    }

    pub fn active_page_id(&self) -> Option<PageId> {
        *self.active.read()
    }

    pub fn set_file_scheme_access(&self, allowed: bool) {
        self.file_scheme_access.store(allowed, Ordering::Release);
    }

    pub fn has_analyzer(&self, id: PageId) -> bool {
        self.tabs
            .read()
            .get(&id)
            .and_then(|tab| tab.channel.as_ref())
            .is_some_and(AnalyzerChannel::is_open)
    }

    /// Number of analyzers actually installed so far.
    pub fn injection_count(&self) -> usize {
        self.injections.load(Ordering::Acquire)
    }

    pub fn is_panel_open(&self, id: PageId) -> bool {
        self.open_panels.read().contains(&id)
    }

    fn check_scriptable(&self, url: &str) -> Result<(), HostError> {
        if PRIVILEGED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
            return Err(HostError::InjectionFailed(format!("Cannot access contents of {}", url)));
        }
        if url.starts_with("file://") && !self.file_scheme_access.load(Ordering::Acquire) {
            return Err(HostError::InjectionFailed(format!(
                "Cannot access contents of {}: file access is not allowed",
                url
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ExtensionHost for BrowserHost {
    async fn query_active_page(&self) -> Result<Option<PageIdentity>, HostError> {
        let Some(id) = self.active_page_id() else {
            return Ok(None);
        };
        let tabs = self.tabs.read();
        let tab = tabs.get(&id).ok_or(HostError::PageNotFound(id))?;

        let identity = PageIdentity::new(id, tab.url.clone());
        Ok(Some(match tab.page.read().title() {
            Some(title) => identity.with_title(title),
            None => identity,
        }))
    }

    async fn inject_analyzer(&self, page: PageId) -> Result<(), HostError> {
        let mut tabs = self.tabs.write();
        let tab = tabs.get_mut(&page).ok_or(HostError::PageNotFound(page))?;
        self.check_scriptable(&tab.url)?;

        if tab.channel.as_ref().is_some_and(AnalyzerChannel::is_open) {
            debug!("Analyzer already installed in {}", page);
            return Ok(());
        }

        let mut analyzer = PageAnalyzer::new(Arc::clone(&tab.page), self.analyzer_config.clone());
        if let Some(extractor) = &self.extractor {
            analyzer = analyzer.with_extractor(Arc::clone(extractor));
        }
        tab.channel = Some(AnalyzerChannel::spawn(page, Arc::new(analyzer)));
        self.injections.fetch_add(1, Ordering::AcqRel);
        info!("Analyzer installed in {}", page);
        Ok(())
    }

    async fn send_message(
        &self,
        page: PageId,
        request: AnalyzerRequest,
    ) -> Result<AnalyzerResponse, HostError> {
        let channel = {
            let tabs = self.tabs.read();
            let tab = tabs.get(&page).ok_or(HostError::PageNotFound(page))?;
            tab.channel.clone().ok_or(HostError::NoReceiver(page))?
        };
        debug!(action = request.action(), "Message to {}", page);
        channel.request(&request, self.config.message_timeout()).await
    }

    async fn is_file_scheme_access_allowed(&self) -> Result<bool, HostError> {
        Ok(self.file_scheme_access.load(Ordering::Acquire))
    }

    async fn open_panel(&self, page: PageId) -> Result<(), HostError> {
        if !self.tabs.read().contains_key(&page) {
            return Err(HostError::PageNotFound(page));
        }
        self.open_panels.write().insert(page);
        info!("Side panel opened for {}", page);
        Ok(())
    }
}
