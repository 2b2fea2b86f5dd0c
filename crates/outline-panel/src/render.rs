//! Panel renderers.

use std::fmt::Write as _;
use std::io::Write;

use parking_lot::Mutex;
use tracing::warn;

use crate::view::{PanelBody, PanelView};

/// Receives every view change of a panel controller.
///
/// Called with the controller's state lock held, so implementations must
/// not call back into the controller.
pub trait PanelRenderer: Send + Sync {
    fn render(&self, view: &PanelView);
}

/// Plain text drawing of a view: the label, one line per outline entry
/// indented by level, `>` before the active entry, then notifications.
pub fn format_view(view: &PanelView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.label);

    match &view.body {
        PanelBody::Loading(message) => {
            let _ = writeln!(out, "... {}", message);
        }
        PanelBody::Empty => {
            out.push_str("No outline\nNo heading elements were found on this page.\n");
        }
        PanelBody::Error(message) => {
            let _ = writeln!(out, "Error: {}", message);
        }
        PanelBody::Outline(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                let marker = if view.active == Some(index) { ">" } else { " " };
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                let _ = writeln!(out, "{} {}{}", marker, indent, entry.title);
            }
        }
    }

    for notification in &view.notifications {
        let _ = writeln!(out, "[{}] {}", notification.kind.as_str(), notification.message);
    }
    out
}

/// Writes every frame as text to a writer.
pub struct TextRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> PanelRenderer for TextRenderer<W> {
    fn render(&self, view: &PanelView) {
        let frame = format_view(view);
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(frame.as_bytes()).and_then(|_| out.flush()) {
            warn!("Failed to write panel frame: {}", e);
        }
    }
}

/// Keeps every rendered frame in memory.
#[derive(Default)]
pub struct RecordingRenderer {
    frames: Mutex<Vec<PanelView>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<PanelView> {
        self.frames.lock().clone()
    }

    pub fn last(&self) -> Option<PanelView> {
        self.frames.lock().last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().len()
    }
}

impl PanelRenderer for RecordingRenderer {
    fn render(&self, view: &PanelView) {
        self.frames.lock().push(view.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Notification, NotificationKind};
    use outline_protocols::OutlineEntry;

    fn outline_view() -> PanelView {
        PanelView {
            label: "example.com".to_string(),
            body: PanelBody::Outline(vec![
                OutlineEntry::new("a", 1, "Intro"),
                OutlineEntry::new("b", 2, "Details"),
            ]),
            active: Some(1),
            notifications: vec![Notification {
                id: 1,
                kind: NotificationKind::Success,
                message: "Navigated to section".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_outline() {
        let text = format_view(&outline_view());
        assert_eq!(
            text,
            "== example.com ==\n  Intro\n>   Details\n[success] Navigated to section\n"
        );
    }

    #[test]
    fn test_format_error_and_loading() {
        let mut view = PanelView {
            label: "x".to_string(),
            body: PanelBody::Error("boom".to_string()),
            ..PanelView::default()
        };
        assert!(format_view(&view).contains("Error: boom"));
        view.body = PanelBody::Loading("Analyzing page...".to_string());
        assert!(format_view(&view).contains("... Analyzing page..."));
    }

    #[test]
    fn test_text_renderer_writes_frames() {
        let renderer = TextRenderer::new(Vec::new());
        renderer.render(&outline_view());
        renderer.render(&outline_view());
        let written = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(written.matches("== example.com ==").count(), 2);
    }

    #[test]
    fn test_recording_renderer() {
        let renderer = RecordingRenderer::new();
        assert!(renderer.last().is_none());
        renderer.render(&outline_view());
        assert_eq!(renderer.frame_count(), 1);
        assert_eq!(renderer.last(), Some(outline_view()));
    }
}
