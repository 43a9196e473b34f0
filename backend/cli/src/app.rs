//! Wires the configured components together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use icebot_composer::{IceBot, OpenRouterClient, PromptComposer};
use icebot_config::IcebotConfig;
use icebot_core::ResponseLog;
use icebot_memory::{InMemoryResponseLog, LogCaps, SqliteResponseLog};

pub fn log_caps(config: &IcebotConfig) -> LogCaps {
    LogCaps {
        used_responses: config.used_responses_cap(),
        feedback: config.feedback_cap(),
    }
}

pub fn build_client(config: &IcebotConfig) -> Result<OpenRouterClient> {
    let Some(api_key) = config.api_key() else {
        bail!("No OpenRouter API key configured. Set OPENROUTER_API_KEY or openrouter.apiKey in config.yaml");
    };
    Ok(OpenRouterClient::new(api_key)
        .with_base_url(config.base_url())
        .with_site(config.site_url(), config.site_name())
        .with_timeout(config.request_timeout()))
}

/// SQLite when `memory.dbPath` is set, otherwise process memory.
pub fn build_response_log(config: &IcebotConfig) -> Result<Arc<dyn ResponseLog>> {
    let caps = log_caps(config);
    match config.db_path() {
        Some(path) => {
            let log = SqliteResponseLog::open(path, caps)
                .with_context(|| format!("Failed to open response log at {}", path.display()))?;
            info!(path = %path.display(), "Using SQLite response log");
            Ok(Arc::new(log))
        }
        None => {
            warn!("No memory.dbPath configured; feedback is kept in memory only");
            Ok(Arc::new(InMemoryResponseLog::with_caps(caps)))
        }
    }
}

pub fn build_bot(config: &IcebotConfig) -> Result<IceBot> {
    let client = build_client(config)?;
    let composer = PromptComposer::new(config.text_model(), config.vision_model());
    let log = build_response_log(config)?;
    Ok(IceBot::new(Arc::new(client), composer, log))
}

pub fn bind_addr(config: &IcebotConfig, port: Option<u16>) -> Result<SocketAddr> {
    let port = port.unwrap_or(config.port());
    format!("{}:{}", config.bind_address(), port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address(), port))
}
