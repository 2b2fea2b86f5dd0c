//! `panel` command: open files as tabs and let a side panel follow them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use outline_config::Config;
use outline_host::Background;
use outline_panel::{PanelController, PanelError, TextRenderer};
use outline_protocols::ExtensionHost;
use tracing::{info, warn};

use crate::cmd_outline::{browser, load_page};

pub(crate) async fn run(
    config: &Config,
    files: &[PathBuf],
    select: Option<usize>,
    dwell_ms: Option<u64>,
) -> Result<()> {
    let host = browser(config);
    let dwell = Duration::from_millis(dwell_ms.unwrap_or(config.panel.poll_interval_ms + 500));

    let background = Background::new(host.clone());
    background.on_installed();

    let mut pages = files.iter();
    let first = pages.next().context("No files given")?;
    let (url, html) = load_page(first, None)?;
    let first_page = host.open_tab(url, &html);

    if !background.on_action_clicked(first_page).await {
        warn!("Continuing without an open side panel");
    }

    let renderer = Arc::new(TextRenderer::new(std::io::stdout()));
    let controller = PanelController::new(host.clone(), renderer, config.panel.clone());
    controller.init().await;
    select_entry(&controller, select).await;

    for file in pages {
        tokio::time::sleep(dwell).await;
        let (url, html) = load_page(file, None)?;
        let page = host.open_tab(url, &html);
        info!("Switched to {} ({})", page, file.display());

        tokio::time::sleep(dwell).await;
        select_entry(&controller, select).await;
    }

    // Let the last notifications expire before tearing down.
    tokio::time::sleep(config.panel.notification_duration()).await;
    controller.destroy();

    if let Ok(Some(active)) = host.query_active_page().await {
        info!("Panel closed on {}", active.url);
    }
    Ok(())
}

async fn select_entry(controller: &Arc<PanelController>, select: Option<usize>) {
    let Some(index) = select else {
        return;
    };
    match controller.handle_selection(index).await {
        Ok(()) => {}
        Err(e @ PanelError::NoSuchEntry(_)) => warn!("Nothing to select: {}", e),
        Err(e) => warn!("Selection failed: {}", e),
    }
}
