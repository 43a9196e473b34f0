//! One-shot generation commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use icebot_composer::IceBot;
use icebot_core::{ProfileBrief, StyleFlags, StyleMode};
use icebot_understanding::{detect_image_mime, ImagePayload, ProfileScanner};

/// Identity used for one-shot commands in the response log.
pub const CLI_USER_ID: &str = "cli";

/// Build a profile brief from CLI words (`--trait funny --length short`).
pub fn profile_brief(traits: &[String], length: Option<&str>, tone: Option<&str>) -> Result<ProfileBrief> {
    let mut value = json!({ "traits": traits });
    if let Some(length) = length {
        value["length"] = json!(length);
    }
    if let Some(tone) = tone {
        value["tone"] = json!(tone);
    }
    serde_json::from_value(value).context("Invalid profile options")
}

pub async fn generate(bot: &IceBot, profile: &str, modes: &[StyleMode]) -> Result<()> {
    let flags = StyleFlags::with_modes(modes.iter().copied());
    let message = bot.generate_ice_breaker(CLI_USER_ID, profile, &flags).await?;
    println!("{message}");
    Ok(())
}

pub async fn enhance(bot: &IceBot, message: &str) -> Result<()> {
    let enhanced = bot.enhance_message(CLI_USER_ID, message).await?;
    println!("{enhanced}");
    Ok(())
}

pub async fn profile(bot: &IceBot, brief: &ProfileBrief) -> Result<()> {
    let profile = bot.generate_profile(CLI_USER_ID, brief).await?;
    println!("{profile}");
    Ok(())
}

pub async fn analyze(bot: Arc<IceBot>, path: &Path) -> Result<()> {
    let scanner = ProfileScanner::new(bot);
    let result = scanner.vision().describe_file(CLI_USER_ID, path).await?;
    println!("{}", result.raw_text.trim());
    Ok(())
}

pub async fn scan(bot: Arc<IceBot>, path: &Path) -> Result<()> {
    let mime = detect_image_mime(path)
        .ok_or_else(|| anyhow!("Unsupported image type: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let payload = ImagePayload::from_bytes(&bytes, mime)?;

    let scanner = ProfileScanner::new(bot);
    let outcome = scanner.scan(CLI_USER_ID, &payload.data_url(), None).await?;
    println!("Analysis:\n{}\n", outcome.analysis);
    println!("Ice breaker:\n{}", outcome.message);
    Ok(())
}
