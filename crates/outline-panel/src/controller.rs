//! Panel controller: tracks the active page, requests outlines from its
//! analyzer and dispatches navigation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use outline_config::PanelConfig;
use outline_protocols::{
    AnalyzerRequest, ExtensionHost, HostError, OutlineEntry, PageId, PageIdentity,
};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::PanelError;
use crate::label::{page_label, UNAVAILABLE_LABEL};
use crate::render::PanelRenderer;
use crate::view::{Notification, NotificationKind, PanelBody, PanelPhase, PanelView};

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

pub const ANALYZING_MESSAGE: &str = "Analyzing page...";
pub const GENERATION_FAILED: &str = "Outline generation failed";
pub const NAVIGATED_MESSAGE: &str = "Navigated to section";
pub const SECTION_NOT_FOUND: &str = "Section not found";
pub const FILE_ACCESS_HINT: &str = "Cannot read local files. Enable \"Allow access to file URLs\" \
     for OutlineGenie on the extensions page, then reopen the panel.";

/// A page whose analyzer answered a ping or was injected by this panel.
type PresenceKey = (PageId, String);

fn presence_key(page: &PageIdentity) -> PresenceKey {
    (page.id, page.url.clone())
}

struct PanelState {
    phase: PanelPhase,
    current_page: Option<PageIdentity>,
    can_access_files: bool,
    present: HashSet<PresenceKey>,
    /// Injections in flight, woken when they finish.
    injecting: HashMap<PresenceKey, Arc<Notify>>,
    /// Last outline shown, with the page it belongs to.
    rendered: Option<(PageIdentity, Vec<OutlineEntry>)>,
    view: PanelView,
}

/// One side panel instance.
pub struct PanelController {
    host: Arc<dyn ExtensionHost>,
    renderer: Arc<dyn PanelRenderer>,
    config: PanelConfig,
    state: Mutex<PanelState>,
    /// Bumped for every outline request and page change; responses carrying
    /// an older value are discarded.
    generation: AtomicU64,
    notification_seq: AtomicU64,
    monitor_started: AtomicBool,
    cancel: CancellationToken,
}

impl PanelController {
    pub fn new(
        host: Arc<dyn ExtensionHost>,
        renderer: Arc<dyn PanelRenderer>,
        config: PanelConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            host,
            renderer,
            config,
            state: Mutex::new(PanelState {
                phase: PanelPhase::Init,
                current_page: None,
                can_access_files: false,
                present: HashSet::new(),
                injecting: HashMap::new(),
                rendered: None,
                view: PanelView::default(),
            }),
            generation: AtomicU64::new(0),
            notification_seq: AtomicU64::new(0),
            monitor_started: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        })
    }

    pub fn phase(&self) -> PanelPhase {
        self.state.lock().phase
    }

    pub fn view(&self) -> PanelView {
        self.state.lock().view.clone()
    }

    pub fn current_page(&self) -> Option<PageIdentity> {
        self.state.lock().current_page.clone()
    }

    /// Outline entries currently shown.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.state.lock().view.entries().to_vec()
    }

    pub fn can_access_files(&self) -> bool {
        self.state.lock().can_access_files
    }

    /// Check file access, detect the active page, start the page monitor
    /// and request the first outline.
    pub async fn init(self: &Arc<Self>) {
        if let Err(e) = self.try_init().await {
            warn!("Panel initialization failed: {}", e);
            self.update(|state| {
                state.view.label = UNAVAILABLE_LABEL.to_string();
                set_body(state, PanelBody::Error(format!("Initialization failed: {}", e)));
            });
        }
    }

    async fn try_init(self: &Arc<Self>) -> Result<(), PanelError> {
        if self.is_destroyed() {
            return Err(PanelError::Destroyed);
        }
        self.check_file_access().await;
        self.detect_current_page().await;
        self.start_monitor()?;
        self.generate_outline().await;
        Ok(())
    }

    async fn check_file_access(&self) {
        let allowed = match self.host.is_file_scheme_access_allowed().await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!("Failed to check file access: {}", e);
                false
            }
        };
        self.state.lock().can_access_files = allowed;
    }

    async fn detect_current_page(&self) {
        match self.host.query_active_page().await {
            Ok(page) => self.update(|state| {
                state.view.label = page_label(page.as_ref());
                state.current_page = page;
            }),
            Err(e) => {
                warn!("Failed to get current page: {}", e);
                self.update(|state| {
                    state.current_page = None;
                    state.view.label = UNAVAILABLE_LABEL.to_string();
                });
            }
        }
    }

    /// Start the periodic active-page check. Only the first call starts it.
    pub fn start_monitor(self: &Arc<Self>) -> Result<(), PanelError> {
        if self.monitor_started.swap(true, Ordering::AcqRel) {
            return Err(PanelError::MonitorRunning);
        }

        let controller: Weak<Self> = Arc::downgrade(self);
        let cancel = self.cancel.clone();
        let period = self.config.poll_interval();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Page monitor stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(controller) = controller.upgrade() else {
                            break;
                        };
                        controller.poll_active_page().await;
                    }
                }
            }
        });
        debug!("Page monitor started every {:?}", period);
        Ok(())
    }

    /// One tick of the page monitor. A changed page gets a new outline
    /// request that runs without blocking later ticks.
    pub async fn poll_active_page(self: &Arc<Self>) {
        if self.is_destroyed() {
            return;
        }

        match self.host.query_active_page().await {
            Ok(Some(active)) => {
                let changed = {
                    let mut state = self.state.lock();
                    if state.phase == PanelPhase::Destroyed {
                        return;
                    }
                    let changed = state
                        .current_page
                        .as_ref()
                        .is_none_or(|current| !current.is_same_page(&active));
                    if changed {
                        // Invalidate requests still in flight for the old page.
                        self.generation.fetch_add(1, Ordering::AcqRel);
                        state.view.label = page_label(Some(&active));
                        state.current_page = Some(active.clone());
                        self.renderer.render(&state.view);
                    }
                    changed
                };

                if changed {
                    info!("Active page changed to {} ({})", active.id, active.url);
                    let controller = Arc::clone(self);
                    tokio::spawn(async move {
                        controller.generate_outline().await;
                    });
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Page monitoring error: {}", e);
                self.generation.fetch_add(1, Ordering::AcqRel);
                self.update(|state| {
                    state.current_page = None;
                    state.view.label = UNAVAILABLE_LABEL.to_string();
                    set_body(state, PanelBody::Error(UNAVAILABLE_LABEL.to_string()));
                });
            }
        }
    }

    /// Make sure an analyzer answers in `page`, injecting one if needed.
    pub async fn ensure_analyzer_present(&self, page: &PageIdentity) -> Result<(), PanelError> {
        let key = presence_key(page);

        match self.host.send_message(page.id, AnalyzerRequest::Ping).await {
            Ok(response) if response.success => {
                self.state.lock().present.insert(key);
                return Ok(());
            }
            Ok(response) => {
                debug!("Ping to {} answered without success: {:?}", page.id, response.error);
            }
            Err(HostError::NoReceiver(_)) => {
                self.state.lock().present.remove(&key);
            }
            Err(e) => {
                if self.state.lock().present.contains(&key) {
                    return Err(e.into());
                }
                debug!("Ping to {} failed ({}), injecting analyzer", page.id, e);
            }
        }

        let in_flight = {
            let mut state = self.state.lock();
            match state.injecting.get(&key) {
                Some(done) => Some(Arc::clone(done)),
                None => {
                    state.injecting.insert(key.clone(), Arc::new(Notify::new()));
                    None
                }
            }
        };
        if let Some(done) = in_flight {
            debug!("Analyzer injection into {} already in flight, waiting", page.id);
            return self.wait_for_injection(page, &key, &done).await;
        }

        let injected = self.host.inject_analyzer(page.id).await;
        let done = {
            let mut state = self.state.lock();
            if injected.is_ok() {
                state.present.insert(key.clone());
            }
            state.injecting.remove(&key)
        };
        if let Some(done) = done {
            done.notify_waiters();
        }
        injected?;
        info!("Injected analyzer into {}", page.id);
        Ok(())
    }

    /// Wait for another caller's injection into `page` and report its outcome.
    async fn wait_for_injection(
        &self,
        page: &PageIdentity,
        key: &PresenceKey,
        done: &Arc<Notify>,
    ) -> Result<(), PanelError> {
        let notified = done.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        let running = self
            .state
            .lock()
            .injecting
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, done));
        if running {
            notified.await;
        }

        if self.state.lock().present.contains(key) {
            Ok(())
        } else {
            Err(HostError::InjectionFailed(format!("Analyzer injection into {} failed", page.id)).into())
        }
    }

    /// Request a fresh outline for the current page and render the result.
    pub async fn generate_outline(&self) {
        let (page, generation, can_access_files) = {
            let state = self.state.lock();
            if state.phase == PanelPhase::Destroyed {
                return;
            }
            let Some(page) = state.current_page.clone() else {
                return;
            };
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            (page, generation, state.can_access_files)
        };

        if page.is_file_scheme() && !can_access_files {
            self.apply(generation, |state| {
                set_body(state, PanelBody::Error(FILE_ACCESS_HINT.to_string()));
            });
            return;
        }

        self.apply(generation, |state| {
            set_body(state, PanelBody::Loading(ANALYZING_MESSAGE.to_string()));
        });

        let response = match self.ensure_analyzer_present(&page).await {
            Ok(()) => self
                .host
                .send_message(page.id, AnalyzerRequest::AnalyzePage)
                .await
                .map_err(PanelError::from),
            Err(e) => Err(e),
        };

        let applied = self.apply(generation, |state| match response {
            Ok(response) if response.success => {
                let outline = response.into_outline();
                state.rendered = Some((page.clone(), outline.clone()));
                if outline.is_empty() {
                    set_body(state, PanelBody::Empty);
                } else {
                    set_body(state, PanelBody::Outline(outline));
                }
            }
            Ok(response) if response.is_in_progress() => {
                let previous = state
                    .rendered
                    .as_ref()
                    .filter(|(owner, _)| owner.is_same_page(&page))
                    .map(|(_, outline)| outline.clone());
                match previous {
                    Some(outline) if !outline.is_empty() => {
                        debug!("Analysis in progress, keeping previous outline");
                        set_body(state, PanelBody::Outline(outline));
                    }
                    Some(_) => set_body(state, PanelBody::Empty),
                    None => set_body(
                        state,
                        PanelBody::Error(response.error.unwrap_or_else(|| GENERATION_FAILED.to_string())),
                    ),
                }
            }
            Ok(response) => {
                warn!("Outline generation failed: {:?}", response.error);
                set_body(
                    state,
                    PanelBody::Error(response.error.unwrap_or_else(|| GENERATION_FAILED.to_string())),
                );
            }
            Err(e) => {
                warn!("Outline generation failed: {}", e);
                set_body(state, PanelBody::Error(format!("{}: {}", GENERATION_FAILED, e)));
            }
        });

        if !applied {
            debug!("Discarded outline response for superseded request {}", generation);
        }
    }

    /// Select the outline entry at `index` and navigate the page to it.
    pub async fn handle_selection(self: &Arc<Self>, index: usize) -> Result<(), PanelError> {
        let (page, entry) = {
            let mut state = self.state.lock();
            if state.phase == PanelPhase::Destroyed {
                return Err(PanelError::Destroyed);
            }
            let page = state.current_page.clone().ok_or(PanelError::NoCurrentPage)?;
            let entry = state
                .view
                .entries()
                .get(index)
                .cloned()
                .ok_or(PanelError::NoSuchEntry(index))?;
            state.view.active = Some(index);
            self.renderer.render(&state.view);
            (page, entry)
        };

        match self
            .host
            .send_message(page.id, AnalyzerRequest::scroll_to(&entry))
            .await
        {
            Ok(response) if response.success => {
                self.notify(NotificationKind::Success, NAVIGATED_MESSAGE);
            }
            Ok(response) => {
                warn!("Navigation to '{}' failed: {:?}", entry.id, response.error);
                self.notify(NotificationKind::Warning, SECTION_NOT_FOUND);
            }
            Err(e) => {
                warn!("Navigation failed: {}", e);
                self.notify(NotificationKind::Error, format!("Navigation failed: {}", e));
            }
        }
        Ok(())
    }

    /// Show a notification that dismisses itself after the configured
    /// duration.
    pub fn notify(self: &Arc<Self>, kind: NotificationKind, message: impl Into<String>) {
        let id = self.notification_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id,
            kind,
            message: message.into(),
        };
        self.update(|state| state.view.notifications.push(notification));

        let controller = Arc::downgrade(self);
        let duration = self.config.notification_duration();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(controller) = controller.upgrade() {
                controller.update(|state| state.view.notifications.retain(|n| n.id != id));
            }
        });
    }

    /// Stop the monitor. Nothing is rendered afterwards.
    pub fn destroy(&self) {
        let mut state = self.state.lock();
        if state.phase == PanelPhase::Destroyed {
            return;
        }
        state.phase = PanelPhase::Destroyed;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cancel.cancel();
        info!("Panel destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().phase == PanelPhase::Destroyed
    }

    /// Mutate the state and render, unless destroyed.
    fn update(&self, change: impl FnOnce(&mut PanelState)) {
        let mut state = self.state.lock();
        if state.phase == PanelPhase::Destroyed {
            return;
        }
        change(&mut state);
        self.renderer.render(&state.view);
    }

    /// Like [`update`](Self::update) but only while `generation` is the
    /// latest request. Returns whether the change was applied.
    fn apply(&self, generation: u64, change: impl FnOnce(&mut PanelState)) -> bool {
        let mut state = self.state.lock();
        if state.phase == PanelPhase::Destroyed
            || self.generation.load(Ordering::Acquire) != generation
        {
            return false;
        }
        change(&mut state);
        self.renderer.render(&state.view);
        true
    }
}

fn set_body(state: &mut PanelState, body: PanelBody) {
    state.phase = body.phase();
    if !matches!(body, PanelBody::Outline(_)) {
        state.view.active = None;
    }
    state.view.body = body;
}

impl Drop for PanelController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
