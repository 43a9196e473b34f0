//! Per-style guidance blocks appended to the ice-breaker prompt.
//!
//! The table is indexed by [`StyleMode`] declaration order; a style with no
//! block contributes nothing to the prompt.

use icebot_core::StyleMode;

pub struct StyleGuidance {
    pub mode: StyleMode,
    pub block: Option<&'static str>,
}

pub static STYLE_GUIDANCE: [StyleGuidance; 13] = [
    StyleGuidance {
        mode: StyleMode::Funny,
        block: Some(
            "Funny Mode Activated:
- Channel comedy legends
- Use unexpected punchlines
- Keep it genuinely hilarious
- No cheap humor",
        ),
    },
    StyleGuidance {
        mode: StyleMode::Serious,
        block: Some(
            "Serious Mode Activated:
- Professional and direct
- Show depth and insight
- Focus on substance
- Keep it sophisticated",
        ),
    },
    StyleGuidance {
        mode: StyleMode::Flirty,
        block: Some(
            "Flirty Mode Activated:
- Channel Casanova energy
- Master of innuendo
- Keep it spicy but classy
- Bold but tasteful",
        ),
    },
    StyleGuidance { mode: StyleMode::Foodie, block: None },
    StyleGuidance { mode: StyleMode::Travel, block: None },
    StyleGuidance {
        mode: StyleMode::Pervy,
        block: Some(
            "Pervy Mode Activated:
- Channel Bob Saget style
- Innocent setup, naughty punchline
- Perfect the art of suggestion
- Stay just this side of appropriate",
        ),
    },
    StyleGuidance {
        mode: StyleMode::Corny,
        block: Some(
            "Corny Mode Activated:
- Classic dad jokes
- Groan-worthy puns
- Cheesy wordplay
- Keep it light and fun",
        ),
    },
    StyleGuidance {
        mode: StyleMode::KnockKnock,
        block: Some(
            "Knock Knock Mode Activated:
- Classic format with a twist
- Profile-relevant punchline
- Clever wordplay
- Keep it sophisticated",
        ),
    },
    StyleGuidance { mode: StyleMode::PopCulture, block: None },
    StyleGuidance { mode: StyleMode::HumorousScenarios, block: None },
    StyleGuidance {
        mode: StyleMode::Cooking,
        block: Some(
            "Cooking Mode Activated:
- Culinary wordplay
- Food-related puns
- Kitchen metaphors
- Keep it tasteful",
        ),
    },
    StyleGuidance {
        mode: StyleMode::Question,
        block: Some(
            "Question Mode Activated:
- End with engaging question
- Make it conversation worthy
- Focus on their interests
- Avoid basic questions",
        ),
    },
    StyleGuidance {
        mode: StyleMode::Asshole,
        block: Some(
            "Asshole Mode Activated:
- Channel toxic CEO/celebrity energy
- Be condescending and dismissive
- Use backhanded compliments
- Show extreme narcissism
- Reference your \"success\"
- Stay sophisticated but mean
- Never use explicit language
- Keep it reportable-adjacent",
        ),
    },
];

pub fn guidance_for(mode: StyleMode) -> Option<&'static str> {
    STYLE_GUIDANCE[mode as usize].block
}
