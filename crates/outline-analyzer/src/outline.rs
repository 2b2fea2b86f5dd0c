//! Heading collection and level normalization.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use outline_protocols::{OutlineEntry, MIN_LEVEL};
use tracing::{debug, warn};

use crate::dom::{Document, NodeId};

#[cfg(test)]
#[path = "outline_tests.rs"]
mod tests;

/// Where an outline entry's element lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementHandle {
    /// Element of the live page document.
    Live(NodeId),
    /// Element of the detached main-content fragment; no live counterpart
    /// was found, so navigation to it can fail.
    Detached(NodeId),
}

/// An outline entry together with its element. Stays in the page context.
#[derive(Debug, Clone)]
pub struct AnalyzedHeading {
    pub entry: OutlineEntry,
    pub handle: ElementHandle,
}

impl AnalyzedHeading {
    pub fn is_detached(&self) -> bool {
        matches!(self.handle, ElementHandle::Detached(_))
    }
}

/// Clamp heading levels in place: the first entry becomes level 1 and every
/// later entry is at most one level deeper than its predecessor. Levels are
/// only ever lowered.
pub fn normalize_levels(entries: &mut [OutlineEntry]) {
    let Some(first) = entries.first_mut() else {
        return;
    };
    first.level = MIN_LEVEL;

    for i in 1..entries.len() {
        let ceiling = entries[i - 1].level + 1;
        if entries[i].level > ceiling {
            entries[i].level = ceiling;
        }
    }
}

/// Synthesizes `{prefix}-{unix millis}-{sequence}` ids.
pub(crate) struct IdGenerator<'a> {
    pub(crate) prefix: &'a str,
    pub(crate) sequence: &'a AtomicU64,
}

impl IdGenerator<'_> {
    fn next(&self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!(
                "{}-{}-{}",
                self.prefix,
                Utc::now().timestamp_millis(),
                self.sequence.fetch_add(1, Ordering::Relaxed)
            );
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

/// Rules shared by both scanning modes.
pub(crate) struct HeadingScan<'a> {
    pub(crate) min_title_chars: usize,
    pub(crate) ids: IdGenerator<'a>,
}

impl HeadingScan<'_> {
    fn title_of(&self, document: &Document, node: NodeId) -> Option<String> {
        let title = document.text_content(node).trim().to_string();
        (title.chars().count() >= self.min_title_chars).then_some(title)
    }

    /// Scan the live document. Existing ids are reused unless an earlier
    /// heading of this scan already claimed the same id.
    pub(crate) fn scan_live(&self, live: &mut Document) -> Vec<AnalyzedHeading> {
        let mut used: HashSet<String> = HashSet::new();
        let mut headings = Vec::new();

        for node in live.headings() {
            let Some(level) = live.heading_level(node) else {
                continue;
            };
            let Some(title) = self.title_of(live, node) else {
                continue;
            };

            let existing = live
                .element_id(node)
                .filter(|id| !used.contains(*id))
                .map(str::to_string);
            let id = match existing {
                Some(id) => id,
                None => {
                    let id = self.ids.next(|c| used.contains(c) || live.contains_id(c));
                    live.set_element_id(node, &id);
                    id
                }
            };

            used.insert(id.clone());
            headings.push(AnalyzedHeading {
                entry: OutlineEntry::new(id, level, title),
                handle: ElementHandle::Live(node),
            });
        }
        headings
    }

    /// Scan a detached main-content fragment and map each heading back onto
    /// the live document by exact title.
    ///
    /// Live headings claimed earlier in the scan are skipped, so repeated
    /// titles map onto distinct live elements in document order. A live
    /// heading carrying the fragment heading's id is preferred.
    pub(crate) fn scan_fragment(
        &self,
        live: &mut Document,
        fragment: &mut Document,
    ) -> Vec<AnalyzedHeading> {
        let live_headings: Vec<(NodeId, String)> = live
            .headings()
            .into_iter()
            .map(|node| (node, live.text_content(node).trim().to_string()))
            .collect();
        let mut claimed: HashSet<NodeId> = HashSet::new();
        let mut used: HashSet<String> = HashSet::new();
        let mut headings = Vec::new();

        for node in fragment.headings() {
            let Some(level) = fragment.heading_level(node) else {
                continue;
            };
            let Some(title) = self.title_of(fragment, node) else {
                continue;
            };
            let fragment_id = fragment.element_id(node).map(str::to_string);

            let unclaimed_with_title = |(candidate, text): &&(NodeId, String)| {
                !claimed.contains(candidate) && *text == title
            };
            let matched = fragment_id
                .as_deref()
                .and_then(|fid| {
                    live_headings
                        .iter()
                        .filter(unclaimed_with_title)
                        .find(|(candidate, _)| live.element_id(*candidate) == Some(fid))
                })
                .or_else(|| live_headings.iter().find(unclaimed_with_title))
                .map(|(candidate, _)| *candidate);

            let id = self.choose_id(live, fragment, fragment_id, matched, &used);

            let handle = match matched {
                Some(live_node) => {
                    claimed.insert(live_node);
                    live.set_element_id(live_node, &id);
                    ElementHandle::Live(live_node)
                }
                None => {
                    warn!("No live element matches heading '{}', keeping detached reference", title);
                    ElementHandle::Detached(node)
                }
            };
            fragment.set_element_id(node, &id);

            used.insert(id.clone());
            headings.push(AnalyzedHeading {
                entry: OutlineEntry::new(id, level, title),
                handle,
            });
        }

        debug!(
            "Mapped {} of {} main-content headings onto the page",
            headings.iter().filter(|h| !h.is_detached()).count(),
            headings.len()
        );
        headings
    }

    fn choose_id(
        &self,
        live: &Document,
        fragment: &Document,
        fragment_id: Option<String>,
        matched: Option<NodeId>,
        used: &HashSet<String>,
    ) -> String {
        // The fragment's own id wins unless another live element owns it.
        if let Some(fid) = fragment_id.filter(|fid| !used.contains(fid)) {
            match live.get_element_by_id(&fid) {
                None => return fid,
                Some(owner) if Some(owner) == matched => return fid,
                Some(_) => {}
            }
        }

        if let Some(live_id) = matched
            .and_then(|node| live.element_id(node))
            .filter(|id| !used.contains(*id))
        {
            return live_id.to_string();
        }

        self.ids
            .next(|c| used.contains(c) || live.contains_id(c) || fragment.contains_id(c))
    }
}
