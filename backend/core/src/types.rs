use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of completion IceBot asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    IceBreaker,
    Enhancement,
    ProfileGeneration,
    ImageAnalysis,
}

impl TaskKind {
    /// Fixed sampling parameters per task. Not user-configurable.
    pub fn sampling(&self) -> SamplingParams {
        match self {
            Self::IceBreaker => SamplingParams {
                temperature: 1.2,
                max_tokens: 150,
                top_p: Some(0.95),
                presence_penalty: Some(0.7),
                frequency_penalty: Some(0.9),
            },
            Self::Enhancement => SamplingParams {
                temperature: 0.7,
                max_tokens: 150,
                top_p: Some(0.9),
                presence_penalty: Some(0.3),
                frequency_penalty: Some(0.3),
            },
            Self::ProfileGeneration => SamplingParams {
                temperature: 1.1,
                max_tokens: 500,
                top_p: Some(0.9),
                presence_penalty: Some(0.6),
                frequency_penalty: Some(0.7),
            },
            Self::ImageAnalysis => SamplingParams {
                temperature: 0.7,
                max_tokens: 500,
                top_p: None,
                presence_penalty: None,
                frequency_penalty: None,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IceBreaker => "ice_breaker",
            Self::Enhancement => "enhancement",
            Self::ProfileGeneration => "profile_generation",
            Self::ImageAnalysis => "image_analysis",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

/// User turn of a completion: plain text, or text plus one image.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    TextWithImage { text: String, image_url: String },
}

impl UserContent {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::TextWithImage { text, .. } => text,
        }
    }
}

/// One request to the completion endpoint. Built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub task: TaskKind,
    pub model: String,
    pub system_prompt: String,
    pub user_content: UserContent,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

impl CompletionRequest {
    pub fn new(
        task: TaskKind,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_content: UserContent,
    ) -> Self {
        let sampling = task.sampling();
        Self {
            task,
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_content,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            presence_penalty: sampling.presence_penalty,
            frequency_penalty: sampling.frequency_penalty,
        }
    }

    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            presence_penalty: self.presence_penalty,
            frequency_penalty: self.frequency_penalty,
        }
    }
}

/// Raw text of the first choice, plus call metadata.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub raw_text: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Personality traits a generated dating profile should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileTrait {
    Funny,
    Mysterious,
    Intellectual,
    Adventurous,
    Romantic,
    Ambitious,
    Creative,
    Athletic,
}

impl ProfileTrait {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Mysterious => "mysterious",
            Self::Intellectual => "intellectual",
            Self::Adventurous => "adventurous",
            Self::Romantic => "romantic",
            Self::Ambitious => "ambitious",
            Self::Creative => "creative",
            Self::Athletic => "athletic",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ProfileLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileTone {
    #[default]
    Casual,
    Professional,
    Playful,
    Sophisticated,
}

impl ProfileTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Playful => "playful",
            Self::Sophisticated => "sophisticated",
        }
    }
}

/// What the user wants their own dating profile to sound like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBrief {
    #[serde(default)]
    pub traits: BTreeSet<ProfileTrait>,
    #[serde(default)]
    pub length: ProfileLength,
    #[serde(default)]
    pub tone: ProfileTone,
}
