//! Config validation: checks with field paths and user-friendly messages.

use crate::schema::IcebotConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &IcebotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_openrouter(config, &mut report);
    validate_gateway(config, &mut report);
    validate_logging(config, &mut report);
    validate_memory(config, &mut report);
    report
}

fn validate_openrouter(config: &IcebotConfig, report: &mut ValidationReport) {
    if config.api_key().is_none() {
        report.warn(
            "openrouter.apiKey",
            "No API key configured; set OPENROUTER_API_KEY or generation calls will fail",
        );
    }
    let base_url = config.base_url();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        report.error("openrouter.baseUrl", "Base URL must start with http:// or https://");
    }
    for (path, model) in [
        ("openrouter.textModel", config.text_model()),
        ("openrouter.visionModel", config.vision_model()),
    ] {
        if model.trim().is_empty() {
            report.error(path, "Model id cannot be empty");
        }
    }
    if config.request_timeout().is_zero() {
        report.error("openrouter.timeoutSecs", "Timeout must be at least one second");
    }
}

fn validate_gateway(config: &IcebotConfig, report: &mut ValidationReport) {
    if config.port() == 0 {
        report.error("gateway.port", "Port must be between 1 and 65535");
    }
    if config.bind_address().trim().is_empty() {
        report.error("gateway.bindAddress", "Bind address cannot be empty");
    }
}

fn validate_logging(config: &IcebotConfig, report: &mut ValidationReport) {
    let level = config.log_level();
    // Directives like `icebot_composer=debug` are passed through to the filter.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn(
            "logging.level",
            format!("Unknown log level '{level}'; expected one of {}", LOG_LEVELS.join(", ")),
        );
    }
}

fn validate_memory(config: &IcebotConfig, report: &mut ValidationReport) {
    if config.used_responses_cap() == 0 {
        report.error("memory.usedResponsesCap", "Cap must be greater than zero");
    }
    if config.feedback_cap() == 0 {
        report.error("memory.feedbackCap", "Cap must be greater than zero");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GatewayConfig, LoggingConfig, MemoryConfig, OpenRouterConfig};

    #[test]
    fn default_config_is_valid_but_warns_about_key() {
        let report = validate(&IcebotConfig::default());
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "openrouter.apiKey");
    }

    #[test]
    fn reports_bad_values() {
        let config = IcebotConfig {
            openrouter: Some(OpenRouterConfig {
                api_key: Some("sk".into()),
                base_url: Some("openrouter.ai".into()),
                timeout_secs: Some(0),
                ..Default::default()
            }),
            gateway: Some(GatewayConfig {
                port: Some(0),
                bind_address: None,
            }),
            memory: Some(MemoryConfig {
                feedback_cap: Some(0),
                ..Default::default()
            }),
            logging: Some(LoggingConfig {
                level: Some("loud".into()),
                log_dir: None,
            }),
        };
        let report = validate(&config);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "openrouter.baseUrl",
                "openrouter.timeoutSecs",
                "gateway.port",
                "memory.feedbackCap"
            ]
        );
        assert_eq!(report.warnings[0].path, "logging.level");
    }

    #[test]
    fn filter_directives_are_accepted() {
        let config = IcebotConfig {
            openrouter: Some(OpenRouterConfig {
                api_key: Some("sk".into()),
                ..Default::default()
            }),
            logging: Some(LoggingConfig {
                level: Some("info,icebot_gateway=debug".into()),
                log_dir: None,
            }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }
}
