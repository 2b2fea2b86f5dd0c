//! Configuration validation.

use crate::schema::Config;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_analyzer(config, &mut result);
        Self::validate_panel(config, &mut result);
        Self::validate_host(config, &mut result);

        result
    }

    fn validate_analyzer(config: &Config, result: &mut ValidationResult) {
        let analyzer = &config.analyzer;

        if analyzer.id_prefix.trim().is_empty() {
            result.add_error(ValidationError::new(
                "analyzer.id_prefix",
                "id_prefix cannot be empty",
            ));
        }

        if analyzer.id_prefix.chars().any(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "analyzer.id_prefix",
                "id_prefix cannot contain whitespace",
            ));
        }

        if analyzer.highlight_class.trim().is_empty() {
            result.add_error(ValidationError::new(
                "analyzer.highlight_class",
                "highlight_class cannot be empty",
            ));
        }

        if analyzer.min_title_chars == 0 {
            result.add_warning(ValidationWarning::new(
                "analyzer.min_title_chars",
                "min_title_chars is 0, headings without text will appear in the outline",
            ));
        }

        if analyzer.highlight_duration_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "analyzer.highlight_duration_ms",
                "highlight_duration_ms is 0, highlights will not be visible",
            ));
        }
    }

    fn validate_panel(config: &Config, result: &mut ValidationResult) {
        if config.panel.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "panel.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if config.panel.poll_interval_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "panel.poll_interval_ms",
                "poll_interval_ms is very high (>60s), page switches will be detected late",
            ));
        }
    }

    fn validate_host(config: &Config, result: &mut ValidationResult) {
        let host = &config.host;

        if host.message_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "host.message_timeout_ms",
                "message_timeout_ms must be greater than 0",
            ));
        }

        if host.viewport_width == 0 || host.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "host.viewport",
                "viewport dimensions must be greater than 0",
            ));
        }

        if host.line_height <= 0.0 || !host.line_height.is_finite() {
            result.add_error(ValidationError::new(
                "host.line_height",
                "line_height must be a positive number",
            ));
        }

        if host.chars_per_line == 0 {
            result.add_error(ValidationError::new(
                "host.chars_per_line",
                "chars_per_line must be greater than 0",
            ));
        }
    }
}
