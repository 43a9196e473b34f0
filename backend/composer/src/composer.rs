use icebot_core::{
    CompletionRequest, ProfileBrief, StyleFlags, StyleMode, TaskKind, UserContent,
};

use crate::persona::PromptPersona;
use crate::styles::guidance_for;

pub const DEFAULT_TEXT_MODEL: &str = "meta-llama/llama-3.1-70b-instruct";
pub const DEFAULT_VISION_MODEL: &str = "openai/gpt-4-vision-preview";

const NO_PROFILE: &str = "No profile provided";

const WRITING_STYLE: &str = "Writing Style:
- Use proper English
- Perfect grammar and punctuation
- Maintain professional tone
- One strategic emoji if it fits
- Vary sentence structure
- Sound sophisticated
- Be articulate and clear

Remember:
- Keep the tone consistent with selected styles
- Mix selected styles naturally
- Perfect the art of suggestion
- Stay just this side of explicit
- Make them laugh AND blush
- Focus on the profile content";

const CLOSING_RULES: &str = "- Use proper English
- Maintain selected tone
- One strategic emoji
- Keep it bold and natural
- Show personality
- Perfect grammar
- Stay within style guide
- Never sound robotic
- Always bring the heat
- Keep it fresh
- Never reference location
- Focus on profile content

Respond with ONLY the message itself";

const IMAGE_ANALYSIS_PROMPT: &str =
    "Analyze this dating profile photo and suggest conversation starters:";

/// Task-specific input to the composer.
#[derive(Debug, Clone, Copy)]
pub enum PromptInput<'a> {
    IceBreaker {
        profile: &'a str,
        flags: &'a StyleFlags,
    },
    Enhancement {
        message: &'a str,
    },
    Profile(&'a ProfileBrief),
    ImageAnalysis {
        image_url: &'a str,
    },
}

impl PromptInput<'_> {
    pub fn task(&self) -> TaskKind {
        match self {
            Self::IceBreaker { .. } => TaskKind::IceBreaker,
            Self::Enhancement { .. } => TaskKind::Enhancement,
            Self::Profile(_) => TaskKind::ProfileGeneration,
            Self::ImageAnalysis { .. } => TaskKind::ImageAnalysis,
        }
    }
}

/// Maps task input to a fully formed completion request. Pure.
///
/// The composer renders whatever style selection it is handed; exclusivity
/// between styles is the selector's job.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    text_model: String,
    vision_model: String,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL)
    }
}

impl PromptComposer {
    pub fn new(text_model: impl Into<String>, vision_model: impl Into<String>) -> Self {
        Self {
            text_model: text_model.into(),
            vision_model: vision_model.into(),
        }
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn vision_model(&self) -> &str {
        &self.vision_model
    }

    pub fn compose(&self, input: PromptInput<'_>) -> CompletionRequest {
        let task = input.task();
        let persona = PromptPersona::for_task(task);

        let (model, user_content) = match input {
            PromptInput::IceBreaker { profile, flags } => (
                &self.text_model,
                UserContent::Text(ice_breaker_prompt(profile, flags)),
            ),
            PromptInput::Enhancement { message } => (
                &self.text_model,
                UserContent::Text(enhancement_prompt(message)),
            ),
            PromptInput::Profile(brief) => {
                (&self.text_model, UserContent::Text(profile_prompt(brief)))
            }
            PromptInput::ImageAnalysis { image_url } => (
                &self.vision_model,
                UserContent::TextWithImage {
                    text: IMAGE_ANALYSIS_PROMPT.to_string(),
                    image_url: image_url.to_string(),
                },
            ),
        };

        CompletionRequest::new(task, model.as_str(), persona.system_instruction, user_content)
    }

    pub fn compose_ice_breaker(&self, profile: &str, flags: &StyleFlags) -> CompletionRequest {
        self.compose(PromptInput::IceBreaker { profile, flags })
    }
}

fn selected_styles_line(flags: &StyleFlags) -> String {
    let labels: Vec<&str> = flags
        .active_modes()
        .into_iter()
        .filter(|mode| *mode != StyleMode::Question)
        .map(|mode| mode.label())
        .collect();
    let question = flags.is_active(StyleMode::Question);

    match (labels.is_empty(), question) {
        (true, false) => "None".to_string(),
        (true, true) => "Question".to_string(),
        (false, false) => labels.join(" + "),
        (false, true) => format!("{} with Question", labels.join(" + ")),
    }
}

fn ice_breaker_prompt(profile: &str, flags: &StyleFlags) -> String {
    let profile = match profile.trim() {
        "" => NO_PROFILE,
        text => text,
    };

    // active_modes() already yields the override first and question last.
    let blocks: Vec<&str> = flags
        .active_modes()
        .into_iter()
        .filter_map(guidance_for)
        .collect();

    let mut prompt = format!(
        "Profile: {profile}\n\nSelected Styles: {}\n\n",
        selected_styles_line(flags)
    );
    for block in blocks {
        prompt.push_str(block);
        prompt.push_str("\n\n");
    }
    prompt.push_str(WRITING_STYLE);
    prompt.push_str(
        "\n\nCreate a single ice breaker that matches the selected styles. \
         Make it sophisticated and natural.\n\nRules:\n- Max 2 sentences",
    );
    if flags.is_active(StyleMode::Question) {
        prompt.push_str(" (plus question)");
    }
    prompt.push('\n');
    prompt.push_str(CLOSING_RULES);
    prompt
}

fn enhancement_prompt(message: &str) -> String {
    format!(
        "Enhance this message while keeping its original tone and intent. \
         Make subtle improvements only:\n\n{}\n\nRespond with ONLY the enhanced message.",
        message.trim()
    )
}

fn profile_prompt(brief: &ProfileBrief) -> String {
    let styles = if brief.traits.is_empty() {
        "any".to_string()
    } else {
        brief
            .traits
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let length = brief.length.as_str();
    let tone = brief.tone.as_str();

    format!(
        "Create a dating profile description with these characteristics:

Styles: {styles}
Length: {length}
Tone: {tone}

Guidelines:
- Write in first person
- Match the selected tone and style
- Keep length appropriate ({length})
- Make it natural and engaging
- Include specific details
- Avoid clichés and generic statements
- Show personality through writing
- Keep it positive and upbeat
- Make it memorable and unique
- Stay classy and tasteful

Create a profile that combines all selected styles naturally while maintaining the specified tone and length.

Respond with ONLY the profile text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use icebot_core::{ProfileLength, ProfileTone, ProfileTrait};

    fn text(req: &CompletionRequest) -> &str {
        req.user_content.text()
    }

    #[test]
    fn blank_profile_without_styles_is_still_a_real_request() {
        let req = PromptComposer::default().compose_ice_breaker("", &StyleFlags::new());
        assert!(text(&req).contains("Profile: No profile provided"));
        assert!(text(&req).contains("Selected Styles: None"));
        assert!(text(&req).ends_with("Respond with ONLY the message itself"));
        assert_eq!(req.system_prompt, crate::persona::ICEBOT.system_instruction);
        assert_eq!(req.model, DEFAULT_TEXT_MODEL);
    }

    #[test]
    fn whitespace_profile_uses_placeholder() {
        let req = PromptComposer::default().compose_ice_breaker("  \n\t", &StyleFlags::new());
        assert!(text(&req).contains(NO_PROFILE));
    }

    #[test]
    fn funny_block_precedes_question_block() {
        let flags = StyleFlags::with_modes([StyleMode::Question, StyleMode::Funny]);
        let req = PromptComposer::default().compose_ice_breaker("Loves hiking", &flags);
        let body = text(&req);

        let funny = body.find("Funny Mode Activated:").expect("funny block");
        let question = body.find("Question Mode Activated:").expect("question block");
        assert!(funny < question);
        assert!(body.contains("Selected Styles: Funny with Question"));
        assert!(body.contains("- Max 2 sentences (plus question)"));
        assert!(body.starts_with("Profile: Loves hiking"));
    }

    #[test]
    fn blocks_render_in_declaration_order() {
        let flags = StyleFlags::with_modes([StyleMode::Cooking, StyleMode::Flirty, StyleMode::Serious]);
        let body = PromptComposer::default()
            .compose_ice_breaker("x", &flags)
            .user_content
            .text()
            .to_string();
        let serious = body.find("Serious Mode Activated:").unwrap();
        let flirty = body.find("Flirty Mode Activated:").unwrap();
        let cooking = body.find("Cooking Mode Activated:").unwrap();
        assert!(serious < flirty && flirty < cooking);
        assert!(body.contains("Selected Styles: Serious + Flirty + Cooking"));
    }

    #[test]
    fn asshole_block_comes_first() {
        let flags = StyleFlags::with_modes([StyleMode::Asshole, StyleMode::Question]);
        let body = PromptComposer::default()
            .compose_ice_breaker("x", &flags)
            .user_content
            .text()
            .to_string();
        let asshole = body.find("Asshole Mode Activated:").unwrap();
        let question = body.find("Question Mode Activated:").unwrap();
        assert!(asshole < question);
        assert!(!body.contains("Funny Mode Activated:"));
    }

    #[test]
    fn styles_without_guidance_are_named_but_add_no_block() {
        let flags = StyleFlags::with_modes([StyleMode::Travel]);
        let body = PromptComposer::default()
            .compose_ice_breaker("x", &flags)
            .user_content
            .text()
            .to_string();
        assert!(body.contains("Selected Styles: Travel"));
        assert!(!body.contains("Mode Activated:"));
    }

    #[test]
    fn ice_breaker_uses_fixed_sampling() {
        let req = PromptComposer::default().compose_ice_breaker("x", &StyleFlags::new());
        assert_eq!(req.task, TaskKind::IceBreaker);
        assert_eq!(req.sampling(), TaskKind::IceBreaker.sampling());
    }

    #[test]
    fn enhancement_wraps_original_message() {
        let req = PromptComposer::default().compose(PromptInput::Enhancement {
            message: "  hey u like dogs?  ",
        });
        assert_eq!(req.task, TaskKind::Enhancement);
        assert!(text(&req).contains("\n\nhey u like dogs?\n\n"));
        assert!(text(&req).ends_with("Respond with ONLY the enhanced message."));
        assert_eq!(req.temperature, 0.7);
    }

    #[test]
    fn profile_prompt_lists_traits_length_and_tone() {
        let brief = ProfileBrief {
            traits: [ProfileTrait::Creative, ProfileTrait::Funny].into_iter().collect(),
            length: ProfileLength::Long,
            tone: ProfileTone::Playful,
        };
        let req = PromptComposer::default().compose(PromptInput::Profile(&brief));
        let body = text(&req);
        assert!(body.contains("Styles: funny, creative"));
        assert!(body.contains("Length: long"));
        assert!(body.contains("Tone: playful"));
        assert_eq!(req.max_tokens, 500);
    }

    #[test]
    fn image_analysis_uses_vision_model_and_multimodal_content() {
        let composer = PromptComposer::new("text-model", "vision-model");
        let req = composer.compose(PromptInput::ImageAnalysis {
            image_url: "data:image/png;base64,AAAA",
        });
        assert_eq!(req.model, "vision-model");
        assert_eq!(
            req.user_content,
            UserContent::TextWithImage {
                text: IMAGE_ANALYSIS_PROMPT.to_string(),
                image_url: "data:image/png;base64,AAAA".to_string(),
            }
        );
        assert!(req.top_p.is_none());
    }
}
