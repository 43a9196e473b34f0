//! Config defaults: applies default values to a parsed config.

use crate::schema::{GatewayConfig, IcebotConfig, LoggingConfig, MemoryConfig, OpenRouterConfig};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SITE_NAME: &str = "IceBot";
pub const DEFAULT_TEXT_MODEL: &str = "meta-llama/llama-3.1-70b-instruct";
pub const DEFAULT_VISION_MODEL: &str = "openai/gpt-4-vision-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_USED_RESPONSES_CAP: usize = 100;
pub const DEFAULT_FEEDBACK_CAP: usize = 1000;

/// Apply all defaults to a freshly loaded config.
///
/// The API key, log directory and database path have no default.
pub fn apply_all_defaults(config: IcebotConfig) -> IcebotConfig {
    let config = apply_openrouter_defaults(config);
    let config = apply_gateway_defaults(config);
    let config = apply_logging_defaults(config);
    apply_memory_defaults(config)
}

fn apply_openrouter_defaults(mut config: IcebotConfig) -> IcebotConfig {
    let openrouter = config.openrouter.get_or_insert_with(OpenRouterConfig::default);
    openrouter.base_url.get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    openrouter.site_url.get_or_insert_with(|| DEFAULT_SITE_URL.to_string());
    openrouter.site_name.get_or_insert_with(|| DEFAULT_SITE_NAME.to_string());
    openrouter.text_model.get_or_insert_with(|| DEFAULT_TEXT_MODEL.to_string());
    openrouter.vision_model.get_or_insert_with(|| DEFAULT_VISION_MODEL.to_string());
    openrouter.timeout_secs.get_or_insert(DEFAULT_TIMEOUT_SECS);
    config
}

fn apply_gateway_defaults(mut config: IcebotConfig) -> IcebotConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway.bind_address.get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    gateway.port.get_or_insert(DEFAULT_PORT);
    config
}

fn apply_logging_defaults(mut config: IcebotConfig) -> IcebotConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

fn apply_memory_defaults(mut config: IcebotConfig) -> IcebotConfig {
    let memory = config.memory.get_or_insert_with(MemoryConfig::default);
    memory.used_responses_cap.get_or_insert(DEFAULT_USED_RESPONSES_CAP);
    memory.feedback_cap.get_or_insert(DEFAULT_FEEDBACK_CAP);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let config = apply_all_defaults(IcebotConfig::default());
        let openrouter = config.openrouter.as_ref().unwrap();
        assert_eq!(openrouter.base_url.as_deref(), Some(DEFAULT_BASE_URL));
        assert_eq!(openrouter.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert!(openrouter.api_key.is_none());
        assert_eq!(config.gateway.as_ref().unwrap().port, Some(DEFAULT_PORT));
        assert_eq!(config.memory.as_ref().unwrap().feedback_cap, Some(1000));
    }

    #[test]
    fn keeps_explicit_values() {
        let config = IcebotConfig {
            gateway: Some(GatewayConfig {
                port: Some(3001),
                bind_address: None,
            }),
            ..Default::default()
        };
        let config = apply_all_defaults(config);
        let gateway = config.gateway.unwrap();
        assert_eq!(gateway.port, Some(3001));
        assert_eq!(gateway.bind_address.as_deref(), Some(DEFAULT_BIND_ADDRESS));
    }
}
