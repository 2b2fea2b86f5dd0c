//! Panel view model.

use outline_protocols::OutlineEntry;

/// Lifecycle of a panel controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Init,
    Loading,
    Rendered,
    Error,
    Destroyed,
}

/// Main area of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Loading(String),
    Outline(Vec<OutlineEntry>),
    /// The page has no usable headings.
    Empty,
    Error(String),
}

impl PanelBody {
    pub fn phase(&self) -> PanelPhase {
        match self {
            Self::Loading(_) => PanelPhase::Loading,
            Self::Outline(_) | Self::Empty => PanelPhase::Rendered,
            Self::Error(_) => PanelPhase::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient message shown over the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Everything a renderer needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub label: String,
    pub body: PanelBody,
    /// Index of the selected outline entry.
    pub active: Option<usize>,
    pub notifications: Vec<Notification>,
}

impl Default for PanelView {
    fn default() -> Self {
        Self {
            label: String::new(),
            body: PanelBody::Loading("Loading...".to_string()),
            active: None,
            notifications: Vec::new(),
        }
    }
}

impl PanelView {
    /// Rendered outline entries, empty unless the body is an outline.
    pub fn entries(&self) -> &[OutlineEntry] {
        match &self.body {
            PanelBody::Outline(entries) => entries,
            _ => &[],
        }
    }
}
