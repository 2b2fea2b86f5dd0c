//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub panel: PanelConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Headings with fewer trimmed characters are skipped.
    #[serde(default = "default_min_title_chars")]
    pub min_title_chars: usize,

    /// Prefix of synthesized element ids.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Try main-content extraction before scanning the whole page.
    #[serde(default = "default_true")]
    pub use_main_content: bool,

    #[serde(default = "default_highlight_duration_ms")]
    pub highlight_duration_ms: u64,

    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,

    /// Id of the `<style>` element carrying the highlight rule.
    #[serde(default = "default_highlight_style_id")]
    pub highlight_style_id: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_title_chars: default_min_title_chars(),
            id_prefix: default_id_prefix(),
            use_main_content: true,
            highlight_duration_ms: default_highlight_duration_ms(),
            highlight_class: default_highlight_class(),
            highlight_style_id: default_highlight_style_id(),
        }
    }
}

impl AnalyzerConfig {
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}

/// Side panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Interval of the active-page check.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long a notification stays visible.
    #[serde(default = "default_notification_duration_ms")]
    pub notification_duration_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            notification_duration_ms: default_notification_duration_ms(),
        }
    }
}

impl PanelConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }
}

/// In-memory browser host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Upper bound for a single message round trip.
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Whether the extension is allowed to read `file://` pages.
    #[serde(default = "default_true")]
    pub file_scheme_access: bool,

    /// Line height used by the layout estimate, in pixels.
    #[serde(default = "default_line_height")]
    pub line_height: f64,

    /// Characters per line used by the layout estimate.
    #[serde(default = "default_chars_per_line")]
    pub chars_per_line: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            message_timeout_ms: default_message_timeout_ms(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            file_scheme_access: true,
            line_height: default_line_height(),
            chars_per_line: default_chars_per_line(),
        }
    }
}

impl HostConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            ansi: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_title_chars() -> usize {
    2
}

fn default_id_prefix() -> String {
    "outline-genie".to_string()
}

fn default_highlight_duration_ms() -> u64 {
    3000
}

fn default_highlight_class() -> String {
    "outline-genie-highlighted".to_string()
}

fn default_highlight_style_id() -> String {
    "outline-genie-highlight-style".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_notification_duration_ms() -> u64 {
    2000
}

fn default_message_timeout_ms() -> u64 {
    10_000
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_line_height() -> f64 {
    24.0
}

fn default_chars_per_line() -> usize {
    80
}

fn default_log_level() -> String {
    "info".to_string()
}
