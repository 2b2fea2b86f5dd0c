//! Page identity as seen from the panel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned identifier of an open page (a browser tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page_{}", self.0)
    }
}

/// The active page as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIdentity {
    pub id: PageId,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PageIdentity {
    pub fn new(id: PageId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Two identities denote the same page when both id and url match.
    /// The title is ignored: pages retitle themselves without navigating.
    pub fn is_same_page(&self, other: &PageIdentity) -> bool {
        self.id == other.id && self.url == other.url
    }

    /// Whether the page was loaded from the local file system.
    pub fn is_file_scheme(&self) -> bool {
        self.url.starts_with("file://")
    }
}
