//! Panel controller errors.

use outline_protocols::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Panel has been destroyed")]
    Destroyed,

    #[error("No active page")]
    NoCurrentPage,

    #[error("No outline entry at index {0}")]
    NoSuchEntry(usize),

    #[error("Page monitor already running")]
    MonitorRunning,
}
