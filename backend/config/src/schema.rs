//! IceBot runtime configuration schema.
//!
//! Every section and field is optional on disk; [`crate::apply_all_defaults`]
//! fills the gaps after loading, and the accessors below fall back to the same
//! defaults for configs built by hand.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::*;

/// Root configuration for IceBot (`config.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcebotConfig {
    /// Completion endpoint and models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<OpenRouterConfig>,

    /// HTTP gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Response log and storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRouterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sent as `HTTP-Referer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Sent as `X-Title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `icebot_composer=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for daily NDJSON log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryConfig {
    /// SQLite file for the response log; in-memory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_responses_cap: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_cap: Option<usize>,
}

impl IcebotConfig {
    fn openrouter_field<'a, T>(&'a self, f: impl FnOnce(&'a OpenRouterConfig) -> Option<T>) -> Option<T> {
        self.openrouter.as_ref().and_then(f)
    }

    /// The configured key, if any non-blank one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.openrouter_field(|o| o.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.openrouter_field(|o| o.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn site_url(&self) -> &str {
        self.openrouter_field(|o| o.site_url.as_deref())
            .unwrap_or(DEFAULT_SITE_URL)
    }

    pub fn site_name(&self) -> &str {
        self.openrouter_field(|o| o.site_name.as_deref())
            .unwrap_or(DEFAULT_SITE_NAME)
    }

    pub fn text_model(&self) -> &str {
        self.openrouter_field(|o| o.text_model.as_deref())
            .unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn vision_model(&self) -> &str {
        self.openrouter_field(|o| o.vision_model.as_deref())
            .unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.openrouter_field(|o| o.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn bind_address(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|g| g.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn port(&self) -> u16 {
        self.gateway
            .as_ref()
            .and_then(|g| g.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.logging.as_ref().and_then(|l| l.log_dir.as_deref())
    }

    pub fn db_path(&self) -> Option<&std::path::Path> {
        self.memory.as_ref().and_then(|m| m.db_path.as_deref())
    }

    pub fn used_responses_cap(&self) -> usize {
        self.memory
            .as_ref()
            .and_then(|m| m.used_responses_cap)
            .unwrap_or(DEFAULT_USED_RESPONSES_CAP)
    }

    pub fn feedback_cap(&self) -> usize {
        self.memory
            .as_ref()
            .and_then(|m| m.feedback_cap)
            .unwrap_or(DEFAULT_FEEDBACK_CAP)
    }
}
