//! Side panel controller for OutlineGenie.
//!
//! The controller follows the active page through an [`ExtensionHost`],
//! makes sure an analyzer runs in it, renders the returned outline into a
//! [`PanelView`] and turns selections into navigation requests.
//!
//! [`ExtensionHost`]: outline_protocols::ExtensionHost

pub mod controller;
pub mod error;
pub mod label;
pub mod render;
pub mod view;

pub use controller::PanelController;
pub use error::PanelError;
pub use label::page_label;
pub use render::{format_view, PanelRenderer, RecordingRenderer, TextRenderer};
pub use view::{Notification, NotificationKind, PanelBody, PanelPhase, PanelView};
