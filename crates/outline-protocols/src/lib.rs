//! # OutlineGenie Protocols
//!
//! Shared definitions for the two halves of OutlineGenie:
//!
//! - the **page analyzer**, which lives in a page context and owns the DOM;
//! - the **panel controller**, which lives in the panel context and only ever
//!   sees plain, serializable outline data.
//!
//! The two sides talk exclusively through [`AnalyzerRequest`] /
//! [`AnalyzerResponse`] messages routed by an [`ExtensionHost`].
//! Contains only data types and interface definitions, no implementations.

pub mod error;
pub mod host;
pub mod message;
pub mod outline;
pub mod page;

pub use error::HostError;
pub use host::ExtensionHost;
pub use message::{AnalyzerRequest, AnalyzerResponse, ErrorCode, ItemData};
pub use outline::{OutlineEntry, MAX_LEVEL, MIN_LEVEL};
pub use page::{PageId, PageIdentity};
