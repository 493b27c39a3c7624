//! Configuration validation.

use std::fmt;

use crate::error::ConfigError;
use crate::schema::Config;

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

    /// Convert the first error into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
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

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_quota(config, &mut result);
        Self::validate_pacing(config, &mut result);
        Self::validate_engagement(config, &mut result);
        Self::validate_runloop(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_audit(config, &mut result);

        Ok(result)
    }

    fn validate_quota(config: &Config, result: &mut ValidationResult) {
        if config.quota.max_comments_per_day == 0 {
            result.add_error(ValidationError::new(
                "quota.max_comments_per_day",
                "max_comments_per_day must be greater than 0",
            ));
        }

        if config.quota.log_max_entries == 0 {
            result.add_error(ValidationError::new(
                "quota.log_max_entries",
                "log_max_entries must be greater than 0",
            ));
        }

        if config.quota.state_file == config.quota.log_file {
            result.add_error(ValidationError::new(
                "quota.log_file",
                "state_file and log_file must differ",
            ));
        }
    }

    fn validate_pacing(config: &Config, result: &mut ValidationResult) {
        for (path, range) in config.pacing.ranges() {
            if !range.is_ordered() {
                result.add_error(ValidationError::new(
                    path,
                    format!("min_ms ({}) exceeds max_ms ({})", range.min_ms, range.max_ms),
                ));
            }
        }

        Self::check_probability(
            "pacing.thinking_probability",
            config.pacing.thinking_probability,
            result,
        );

        if config.pacing.inter_comment.max_ms < 60_000 {
            result.add_warning(ValidationWarning::new(
                "pacing.inter_comment",
                "replies less than a minute apart look automated",
            ));
        }
    }

    fn validate_engagement(config: &Config, result: &mut ValidationResult) {
        for (path, value) in config.engagement.probabilities() {
            Self::check_probability(path, value, result);
        }
    }

    fn validate_runloop(config: &Config, result: &mut ValidationResult) {
        if config.runloop.max_consecutive_failures == 0 {
            result.add_error(ValidationError::new(
                "runloop.max_consecutive_failures",
                "max_consecutive_failures must be greater than 0",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.browser.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if config.browser.connect_attempts == 0 {
            result.add_error(ValidationError::new(
                "browser.connect_attempts",
                "connect_attempts must be greater than 0",
            ));
        }

        if config.browser.home_url.is_none() && config.browser.search_keywords.is_empty() {
            result.add_error(ValidationError::new(
                "browser.search_keywords",
                "either home_url or search_keywords must be set",
            ));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;
        if provider.api_key.as_deref().is_none_or(str::is_empty) {
            result.add_warning(ValidationWarning::new(
                "provider.api_key",
                "API key is not set, analysis and replies will fail",
            ));
        }

        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "provider.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if provider.model.is_empty() {
            result.add_error(ValidationError::new("provider.model", "model cannot be empty"));
        }

        for (path, temp) in [
            ("provider.analysis_temperature", provider.analysis_temperature),
            ("provider.reply_temperature", provider.reply_temperature),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                result.add_error(ValidationError::new(path, "temperature must be within [0, 2]"));
            }
        }
    }

    fn validate_audit(config: &Config, result: &mut ValidationResult) {
        let audit = &config.audit;
        if audit.enabled && audit.effective_api_key().is_none() {
            result.add_warning(ValidationWarning::new(
                "audit.api_key",
                "audit is enabled but no API key is set, session logging is disabled",
            ));
        }

        if !audit.base_url.starts_with("http://") && !audit.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "audit.base_url",
                "base_url must start with http:// or https://",
            ));
        }
    }

    fn check_probability(path: &str, value: f64, result: &mut ValidationResult) {
        if !(0.0..=1.0).contains(&value) {
            result.add_error(ValidationError::new(
                path,
                format!("probability {value} must be within [0, 1]"),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
