//! `icebot config` subcommands.

use std::path::Path;

use anyhow::{bail, Context, Result};

use icebot_config::{redact, validate, write_config, IcebotConfig};

/// Print the effective config with secrets masked.
pub fn show(config: &IcebotConfig) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    println!("{}", serde_json::to_string_pretty(&redact(&value))?);
    Ok(())
}

/// Write a starter config. Refuses to replace an existing file unless `force`.
pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    let config = icebot_config::apply_all_defaults(IcebotConfig::default());
    write_config(&config, path).await?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Print the validation report. Fails when the config has errors.
pub fn check(config: &IcebotConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !report.is_valid() {
        bail!("{} config error(s)", report.errors.len());
    }
    println!("Config OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use icebot_config::{config_file_path, load_config};

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());

        init(&path, false).await.unwrap();
        let written = load_config(&path).await.unwrap();
        assert_eq!(written.port(), 8080);
        assert!(written.api_key().is_none());

        assert!(init(&path, false).await.is_err());
        assert!(init(&path, true).await.is_ok());
    }

    #[test]
    fn check_fails_on_errors() {
        use icebot_config::schema::GatewayConfig;
        let config = IcebotConfig {
            gateway: Some(GatewayConfig {
                port: Some(0),
                bind_address: None,
            }),
            ..Default::default()
        };
        assert!(check(&config).is_err());
        assert!(check(&IcebotConfig::default()).is_ok());
    }
}
