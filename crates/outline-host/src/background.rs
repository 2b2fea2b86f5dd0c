//! Extension background behaviour.

use std::sync::Arc;

use outline_protocols::{ExtensionHost, PageId};
use tracing::{info, warn};

/// Reacts to installation and to clicks on the toolbar action.
pub struct Background {
    host: Arc<dyn ExtensionHost>,
}

impl Background {
    pub fn new(host: Arc<dyn ExtensionHost>) -> Self {
        Self { host }
    }

    pub fn on_installed(&self) {
        info!("OutlineGenie extension installed");
    }

    /// Open the side panel for the clicked page. Failures are logged, not
    /// propagated. Returns whether the panel opened.
    pub async fn on_action_clicked(&self, page: PageId) -> bool {
        match self.host.open_panel(page).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to open side panel: {}", e);
                false
            }
        }
    }
}
