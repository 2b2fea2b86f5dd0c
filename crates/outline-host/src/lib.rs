//! In-memory extension host for OutlineGenie.
//!
//! Stands in for the browser: tabs hold parsed documents, injected
//! analyzers listen on serialized message channels, and the background
//! opens the panel when the toolbar action is clicked.

pub mod background;
pub mod browser;
mod channel;

pub use background::Background;
pub use browser::BrowserHost;
