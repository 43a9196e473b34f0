//! Style selector: the tone/content modes a user can pick for a generated message.
//!
//! The asshole mode overrides every other content style. Rather than a flat
//! boolean record with the override rule re-checked at each call site, the
//! selection is a [`Tone`] (either the override or a combination of content
//! styles) plus the independent `question` flag, so an "asshole + funny" state
//! cannot be constructed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every recognized mode, declared in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleMode {
    Funny,
    Serious,
    Flirty,
    Foodie,
    Travel,
    Pervy,
    Corny,
    KnockKnock,
    PopCulture,
    HumorousScenarios,
    Cooking,
    Question,
    Asshole,
}

impl StyleMode {
    pub const ALL: [StyleMode; 13] = [
        StyleMode::Funny,
        StyleMode::Serious,
        StyleMode::Flirty,
        StyleMode::Foodie,
        StyleMode::Travel,
        StyleMode::Pervy,
        StyleMode::Corny,
        StyleMode::KnockKnock,
        StyleMode::PopCulture,
        StyleMode::HumorousScenarios,
        StyleMode::Cooking,
        StyleMode::Question,
        StyleMode::Asshole,
    ];

    /// Wire name (camelCase), as used in JSON style records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Serious => "serious",
            Self::Flirty => "flirty",
            Self::Foodie => "foodie",
            Self::Travel => "travel",
            Self::Pervy => "pervy",
            Self::Corny => "corny",
            Self::KnockKnock => "knockKnock",
            Self::PopCulture => "popCulture",
            Self::HumorousScenarios => "humorousScenarios",
            Self::Cooking => "cooking",
            Self::Question => "question",
            Self::Asshole => "asshole",
        }
    }

    /// Human-readable name used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Funny => "Funny",
            Self::Serious => "Serious",
            Self::Flirty => "Flirty",
            Self::Foodie => "Foodie",
            Self::Travel => "Travel",
            Self::Pervy => "Pervy",
            Self::Corny => "Corny",
            Self::KnockKnock => "Knock Knock",
            Self::PopCulture => "Pop Culture",
            Self::HumorousScenarios => "Humorous Scenarios",
            Self::Cooking => "Cooking",
            Self::Question => "Question",
            Self::Asshole => "Asshole",
        }
    }

    /// Content styles are everything the asshole override suppresses.
    pub fn is_content_style(&self) -> bool {
        !matches!(self, Self::Question | Self::Asshole)
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleMode {
    type Err = ValidationError;

    /// Accepts the camelCase wire name, case-insensitively, or the
    /// kebab/snake spelling (`knock-knock`, `pop_culture`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| ValidationError::UnknownStyle(s.to_string()))
    }
}

/// Either the exclusive override or any combination of content styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tone {
    Asshole,
    /// Never contains `Question` or `Asshole`.
    Combination(BTreeSet<StyleMode>),
}

impl Default for Tone {
    fn default() -> Self {
        Self::Combination(BTreeSet::new())
    }
}

/// A valid style selection. See the module docs for the exclusivity rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StyleSelection", into = "StyleSelection")]
pub struct StyleFlags {
    tone: Tone,
    question: bool,
}

impl StyleFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection by switching on each mode in turn.
    pub fn with_modes(modes: impl IntoIterator<Item = StyleMode>) -> Self {
        modes
            .into_iter()
            .fold(Self::default(), |flags, mode| flags.set_mode(mode, true))
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }

    pub fn is_asshole(&self) -> bool {
        matches!(self.tone, Tone::Asshole)
    }

    pub fn is_active(&self, mode: StyleMode) -> bool {
        match mode {
            StyleMode::Question => self.question,
            StyleMode::Asshole => self.is_asshole(),
            content => match &self.tone {
                Tone::Asshole => false,
                Tone::Combination(set) => set.contains(&content),
            },
        }
    }

    /// Returns the selection with `mode` set to `value`.
    ///
    /// While the asshole override is on, setting any content style is a no-op.
    /// `question` is independent of the override.
    pub fn set_mode(&self, mode: StyleMode, value: bool) -> Self {
        let mut next = self.clone();
        match (mode, value) {
            (StyleMode::Question, value) => next.question = value,
            (StyleMode::Asshole, true) => next.tone = Tone::Asshole,
            (StyleMode::Asshole, false) => {
                if next.is_asshole() {
                    // Content styles were forced off while the override was active.
                    next.tone = Tone::default();
                }
            }
            (content, value) => match &mut next.tone {
                Tone::Asshole => {}
                Tone::Combination(set) => {
                    if value {
                        set.insert(content);
                    } else {
                        set.remove(&content);
                    }
                }
            },
        }
        next
    }

    /// UI toggle: flip `mode` subject to the same rules as [`set_mode`](Self::set_mode).
    pub fn toggle(&self, mode: StyleMode) -> Self {
        self.set_mode(mode, !self.is_active(mode))
    }

    /// Active modes in rendering order: the override first, then content
    /// styles in declaration order, then `question`.
    pub fn active_modes(&self) -> Vec<StyleMode> {
        let mut modes = Vec::new();
        match &self.tone {
            Tone::Asshole => modes.push(StyleMode::Asshole),
            Tone::Combination(set) => modes.extend(set.iter().copied()),
        }
        if self.question {
            modes.push(StyleMode::Question);
        }
        modes
    }

    pub fn is_empty(&self) -> bool {
        !self.question && matches!(&self.tone, Tone::Combination(set) if set.is_empty())
    }
}

/// Flat boolean record, the wire shape of [`StyleFlags`].
///
/// Decoding a record with `asshole` set drops every other content style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSelection {
    pub funny: bool,
    pub serious: bool,
    pub flirty: bool,
    pub foodie: bool,
    pub travel: bool,
    pub pervy: bool,
    pub corny: bool,
    pub knock_knock: bool,
    pub pop_culture: bool,
    pub humorous_scenarios: bool,
    pub cooking: bool,
    pub question: bool,
    pub asshole: bool,
}

impl StyleSelection {
    fn get(&self, mode: StyleMode) -> bool {
        match mode {
            StyleMode::Funny => self.funny,
            StyleMode::Serious => self.serious,
            StyleMode::Flirty => self.flirty,
            StyleMode::Foodie => self.foodie,
            StyleMode::Travel => self.travel,
            StyleMode::Pervy => self.pervy,
            StyleMode::Corny => self.corny,
            StyleMode::KnockKnock => self.knock_knock,
            StyleMode::PopCulture => self.pop_culture,
            StyleMode::HumorousScenarios => self.humorous_scenarios,
            StyleMode::Cooking => self.cooking,
            StyleMode::Question => self.question,
            StyleMode::Asshole => self.asshole,
        }
    }

    fn slot(&mut self, mode: StyleMode) -> &mut bool {
        match mode {
            StyleMode::Funny => &mut self.funny,
            StyleMode::Serious => &mut self.serious,
            StyleMode::Flirty => &mut self.flirty,
            StyleMode::Foodie => &mut self.foodie,
            StyleMode::Travel => &mut self.travel,
            StyleMode::Pervy => &mut self.pervy,
            StyleMode::Corny => &mut self.corny,
            StyleMode::KnockKnock => &mut self.knock_knock,
            StyleMode::PopCulture => &mut self.pop_culture,
            StyleMode::HumorousScenarios => &mut self.humorous_scenarios,
            StyleMode::Cooking => &mut self.cooking,
            StyleMode::Question => &mut self.question,
            StyleMode::Asshole => &mut self.asshole,
        }
    }
}

impl From<StyleSelection> for StyleFlags {
    fn from(selection: StyleSelection) -> Self {
        if selection.asshole {
            return Self {
                tone: Tone::Asshole,
                question: selection.question,
            };
        }
        Self::with_modes(
            StyleMode::ALL
                .into_iter()
                .filter(|mode| selection.get(*mode)),
        )
    }
}

impl From<StyleFlags> for StyleSelection {
    fn from(flags: StyleFlags) -> Self {
        let mut selection = StyleSelection::default();
        for mode in flags.active_modes() {
            *selection.slot(mode) = true;
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_subset() -> impl Iterator<Item = StyleFlags> {
        // All 2^13 flat records, funneled through the decoding rules.
        (0u32..(1 << StyleMode::ALL.len())).map(|bits| {
            let mut selection = StyleSelection::default();
            for (i, mode) in StyleMode::ALL.iter().enumerate() {
                *selection.slot(*mode) = bits & (1 << i) != 0;
            }
            StyleFlags::from(selection)
        })
    }

    #[test]
    fn asshole_forces_content_styles_off_and_keeps_question() {
        for flags in every_subset() {
            let next = flags.set_mode(StyleMode::Asshole, true);
            assert!(next.is_asshole());
            for mode in StyleMode::ALL.iter().filter(|m| m.is_content_style()) {
                assert!(!next.is_active(*mode), "{mode} survived the override");
            }
            assert_eq!(
                next.is_active(StyleMode::Question),
                flags.is_active(StyleMode::Question)
            );
        }
    }

    #[test]
    fn content_styles_rejected_while_asshole_active() {
        for flags in every_subset().filter(StyleFlags::is_asshole) {
            assert_eq!(flags.set_mode(StyleMode::Funny, true), flags);
            assert_eq!(flags.toggle(StyleMode::Cooking), flags);
        }
    }

    #[test]
    fn question_can_change_while_asshole_active() {
        let flags = StyleFlags::with_modes([StyleMode::Asshole]);
        let next = flags.set_mode(StyleMode::Question, true);
        assert!(next.is_asshole());
        assert!(next.is_active(StyleMode::Question));
    }

    #[test]
    fn clearing_asshole_restores_empty_combination() {
        let flags = StyleFlags::with_modes([StyleMode::Funny, StyleMode::Question])
            .set_mode(StyleMode::Asshole, true)
            .set_mode(StyleMode::Asshole, false);
        assert!(!flags.is_asshole());
        assert!(!flags.is_active(StyleMode::Funny));
        assert!(flags.is_active(StyleMode::Question));
    }

    #[test]
    fn clearing_asshole_when_inactive_is_noop() {
        let flags = StyleFlags::with_modes([StyleMode::Corny, StyleMode::Travel]);
        assert_eq!(flags.set_mode(StyleMode::Asshole, false), flags);
    }

    #[test]
    fn set_mode_only_touches_target() {
        let flags = StyleFlags::with_modes([StyleMode::Funny, StyleMode::Flirty]);
        let next = flags.set_mode(StyleMode::Flirty, false);
        assert!(next.is_active(StyleMode::Funny));
        assert!(!next.is_active(StyleMode::Flirty));
        assert_eq!(flags.active_modes(), vec![StyleMode::Funny, StyleMode::Flirty]);
    }

    #[test]
    fn active_modes_follow_declaration_order() {
        let flags = StyleFlags::with_modes([
            StyleMode::Question,
            StyleMode::Cooking,
            StyleMode::Funny,
            StyleMode::KnockKnock,
        ]);
        assert_eq!(
            flags.active_modes(),
            vec![
                StyleMode::Funny,
                StyleMode::KnockKnock,
                StyleMode::Cooking,
                StyleMode::Question
            ]
        );
    }

    #[test]
    fn asshole_listed_first() {
        let flags = StyleFlags::with_modes([StyleMode::Question, StyleMode::Asshole]);
        assert_eq!(
            flags.active_modes(),
            vec![StyleMode::Asshole, StyleMode::Question]
        );
    }

    #[test]
    fn decoding_flat_record_applies_override() {
        let flags: StyleFlags =
            serde_json::from_str(r#"{"asshole": true, "funny": true, "question": true}"#).unwrap();
        assert!(flags.is_asshole());
        assert!(!flags.is_active(StyleMode::Funny));
        assert!(flags.is_active(StyleMode::Question));
    }

    #[test]
    fn encodes_as_flat_record() {
        let flags = StyleFlags::with_modes([StyleMode::KnockKnock]);
        let json = serde_json::to_value(&flags).unwrap();
        assert_eq!(json["knockKnock"], true);
        assert_eq!(json["funny"], false);
        assert_eq!(json["asshole"], false);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("knockKnock".parse::<StyleMode>().unwrap(), StyleMode::KnockKnock);
        assert_eq!("knock-knock".parse::<StyleMode>().unwrap(), StyleMode::KnockKnock);
        assert_eq!("POP_CULTURE".parse::<StyleMode>().unwrap(), StyleMode::PopCulture);
        assert_eq!(
            "sarcastic".parse::<StyleMode>(),
            Err(ValidationError::UnknownStyle("sarcastic".into()))
        );
    }
}
