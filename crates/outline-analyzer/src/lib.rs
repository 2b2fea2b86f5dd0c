//! Page analyzer for OutlineGenie.
//!
//! Builds a heading outline of a page (preferring its main content),
//! normalizes heading levels and scrolls to / highlights outline entries on
//! request. Talks to the panel only through the request/response contract
//! of `outline-protocols`.

pub mod analyzer;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod outline;
pub mod page;

pub use analyzer::PageAnalyzer;
pub use dom::{BoundingBox, Document, LayoutMetrics, NodeId, ViewportInfo};
pub use error::{AnalyzerError, ExtractError};
pub use extractor::{ContentExtractor, LandmarkExtractor};
pub use outline::{normalize_levels, AnalyzedHeading, ElementHandle};
pub use page::{PageContext, ScrollBehavior, ScrollRequest, SharedPage};
