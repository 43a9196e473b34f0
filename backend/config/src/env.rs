//! Environment variable substitution and overrides for config values.
//!
//! `${VAR_NAME}` in any string value is resolved at load time. Only uppercase
//! `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to a literal `${VAR}`.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

use crate::schema::{GatewayConfig, IcebotConfig, LoggingConfig, MemoryConfig, OpenRouterConfig};

/// `$${VAR}` (escaped, group 1 is `$`) or `${VAR}` (group 2 is the name).
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references from the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars using a provided map (useful for testing).
///
/// Fails on the first reference to a variable that is unset or empty.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute_value(value, env, "")?)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    env: &HashMap<String, String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for caps in ENV_VAR_PATTERN.captures_iter(s) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        out.push_str(&s[last..whole.start()]);
        if caps.get(1).is_some() {
            out.push_str(&whole.as_str()[1..]);
        } else {
            match env.get(name.as_str()) {
                Some(val) if !val.is_empty() => out.push_str(val),
                _ => {
                    return Err(MissingEnvVarError {
                        var_name: name.as_str().to_string(),
                        config_path: path.to_string(),
                    })
                }
            }
        }
        last = whole.end();
    }
    out.push_str(&s[last..]);
    Ok(out)
}

/// Apply the recognized environment overrides on top of the file config.
///
/// `OPENROUTER_API_KEY`, `ICEBOT_PORT`, `ICEBOT_BIND`, `ICEBOT_DB`,
/// `ICEBOT_LOG_DIR` and `RUST_LOG` win over their config counterparts. Empty
/// values are ignored, as is an unparseable port.
pub fn apply_env_overrides(mut config: IcebotConfig, env: &HashMap<String, String>) -> IcebotConfig {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(key) = get("OPENROUTER_API_KEY") {
        config
            .openrouter
            .get_or_insert_with(OpenRouterConfig::default)
            .api_key = Some(key.to_string());
    }
    if let Some(port) = get("ICEBOT_PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
            }
            Err(_) => warn!(value = %port, "Ignoring invalid ICEBOT_PORT"),
        }
    }
    if let Some(bind) = get("ICEBOT_BIND") {
        config
            .gateway
            .get_or_insert_with(GatewayConfig::default)
            .bind_address = Some(bind.to_string());
    }
    if let Some(db) = get("ICEBOT_DB") {
        config.memory.get_or_insert_with(MemoryConfig::default).db_path = Some(PathBuf::from(db));
    }
    if let Some(dir) = get("ICEBOT_LOG_DIR") {
        config.logging.get_or_insert_with(LoggingConfig::default).log_dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }
    config
}
