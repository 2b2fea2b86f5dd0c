//! Host and transport errors.

use thiserror::Error;

use crate::page::PageId;

/// Failures reported by the extension host or its message channel.
#[derive(Debug, Error)]
pub enum HostError {
    /// The page (tab) does not exist, or was closed.
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    /// Nothing is listening in the page context.
    #[error("Could not establish connection to {0}: receiving end does not exist")]
    NoReceiver(PageId),

    /// The page context did not answer in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The channel closed before a response was delivered.
    #[error("Message channel closed")]
    ChannelClosed,

    /// The analyzer could not be injected into the page.
    #[error("Script injection failed: {0}")]
    InjectionFailed(String),

    /// A message could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A host capability is unavailable (e.g. no active window).
    #[error("Host capability unavailable: {0}")]
    Unavailable(String),
}
