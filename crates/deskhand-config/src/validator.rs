//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{BackendKind, Config};

/// Smallest autopress interval the engine accepts at all.
const HARD_MIN_INTERVAL_MS: u64 = 10;

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

    /// Fail on the first error, otherwise hand back the warnings.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
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

        Self::validate_server(config, &mut result);
        Self::validate_backend(config, &mut result);
        Self::validate_snapshot(config, &mut result);
        Self::validate_autopress(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        } else if !config.server.is_loopback() {
            result.add_warning(ValidationWarning::new(
                "server.host",
                format!(
                    "Binding to non-loopback host '{}' exposes input injection to the network",
                    config.server.host
                ),
            ));
        }
    }

    fn validate_backend(config: &Config, result: &mut ValidationResult) {
        if config.backend.kind == BackendKind::DryRun {
            result.add_warning(ValidationWarning::new(
                "backend.kind",
                "dry_run backend records calls without touching any device",
            ));
        }
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        let snapshot = &config.snapshot;

        if !(1..=100).contains(&snapshot.jpeg_quality) {
            result.add_error(ValidationError::new(
                "snapshot.jpeg_quality",
                "jpeg_quality must be between 1 and 100",
            ));
        }

        if snapshot.max_pixels == 0 {
            result.add_error(ValidationError::new(
                "snapshot.max_pixels",
                "max_pixels must be greater than 0",
            ));
        }

        if !snapshot.after_action {
            result.add_warning(ValidationWarning::new(
                "snapshot.after_action",
                "Snapshots are disabled; input operations will return text only",
            ));
        }
    }

    fn validate_autopress(config: &Config, result: &mut ValidationResult) {
        if config.autopress.min_interval_ms < HARD_MIN_INTERVAL_MS {
            result.add_error(ValidationError::new(
                "autopress.min_interval_ms",
                format!("min_interval_ms must be at least {}", HARD_MIN_INTERVAL_MS),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.trim();
        if level.is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }

        if config.logging.file && config.logging.dir.is_empty() {
            result.add_error(ValidationError::new(
                "logging.dir",
                "File logging is enabled but no directory is set",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
