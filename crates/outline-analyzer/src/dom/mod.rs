//! Mutable page document model.
//!
//! HTML is parsed with `scraper` (html5ever) and copied into an arena of
//! nodes that supports the mutations the analyzer needs: writing ids,
//! toggling classes, inserting a style sheet and detaching subtrees.
//! Node handles stay valid after a subtree is removed; lookups by id only
//! consider attached nodes.

mod document;
mod dom_types;
mod layout;
mod parse;
mod serialize;

pub use document::{Document, NodeId};
pub use dom_types::{BoundingBox, ViewportInfo};
pub use layout::LayoutMetrics;

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
