//! Photo-to-message pipeline: analyze a profile photo, then open with an ice
//! breaker built from the analysis.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use icebot_composer::IceBot;
use icebot_core::{IcebotError, StyleFlags, StyleMode};

use crate::vision::VisionAnalyzer;

/// Styles used for the opener generated from a scanned photo.
pub const SCAN_STYLE: [StyleMode; 3] = [StyleMode::Funny, StyleMode::Flirty, StyleMode::Question];

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub analysis: String,
    pub message: String,
}

pub struct ProfileScanner {
    vision: VisionAnalyzer,
    bot: Arc<IceBot>,
}

impl ProfileScanner {
    pub fn new(bot: Arc<IceBot>) -> Self {
        let vision = VisionAnalyzer::new(bot.client(), bot.composer().clone());
        Self { vision, bot }
    }

    pub fn vision(&self) -> &VisionAnalyzer {
        &self.vision
    }

    /// Two sequential completions. A failed analysis skips the second call.
    pub async fn scan(
        &self,
        user_id: &str,
        image_data: &str,
        mime_hint: Option<&str>,
    ) -> Result<ScanOutcome, IcebotError> {
        let analysis = self.vision.analyze(user_id, image_data, mime_hint).await?;
        let analysis = analysis.raw_text.trim().to_string();
        info!(chars = analysis.len(), "Profile photo analyzed");

        let flags = StyleFlags::with_modes(SCAN_STYLE);
        let message = self.bot.generate_ice_breaker(user_id, &analysis, &flags).await?;
        Ok(ScanOutcome { analysis, message })
    }
}
