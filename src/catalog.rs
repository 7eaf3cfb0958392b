use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

pub const INFERENCE_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "microsoft/DialoGPT-large";

/// A selectable hosted model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
    pub display_name: &'static str,
    pub id: &'static str,
}

pub const AVAILABLE_MODELS: [ModelEntry; 6] = [
    ModelEntry {
        display_name: "Microsoft DialoGPT Large",
        id: "microsoft/DialoGPT-large",
    },
    ModelEntry {
        display_name: "Facebook BlenderBot",
        id: "facebook/blenderbot-400M-distill",
    },
    ModelEntry {
        display_name: "Google Flan-T5 Large",
        id: "google/flan-t5-large",
    },
    ModelEntry {
        display_name: "Mistral 7B Instruct",
        id: "mistralai/Mistral-7B-Instruct-v0.1",
    },
    ModelEntry {
        display_name: "Code Llama Instruct",
        id: "codellama/CodeLlama-7b-Instruct-hf",
    },
    ModelEntry {
        display_name: "Qwen 2.5 72B Instruct",
        id: "Qwen/Qwen2.5-72B-Instruct",
    },
];

/// Look a model up by id or display name, falling back to the best fuzzy
/// match on display name.
pub fn find(query: &str) -> Option<ModelEntry> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(entry) = AVAILABLE_MODELS.iter().find(|m| {
        m.id.eq_ignore_ascii_case(query) || m.display_name.eq_ignore_ascii_case(query)
    }) {
        return Some(*entry);
    }

    let matcher = SkimMatcherV2::default();
    AVAILABLE_MODELS
        .iter()
        .filter_map(|m| {
            let by_name = matcher.fuzzy_match(m.display_name, query);
            let by_id = matcher.fuzzy_match(m.id, query);
            by_name.max(by_id).map(|score| (score, *m))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, m)| m)
}

/// Display name for a model id, or the id itself for off-catalog models
pub fn display_name(model_id: &str) -> &str {
    AVAILABLE_MODELS
        .iter()
        .find(|m| m.id == model_id)
        .map(|m| m.display_name)
        .unwrap_or(model_id)
}

/// Where requests are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    #[default]
    #[serde(alias = "Inference API")]
    InferenceApi,
    #[serde(alias = "Custom URL")]
    CustomUrl,
    #[serde(alias = "Space")]
    Space,
}

impl FromStr for EndpointKind {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "inference api" | "inference" | "api" => Ok(EndpointKind::InferenceApi),
            "custom url" | "custom" | "url" => Ok(EndpointKind::CustomUrl),
            "space" | "spaces" => Ok(EndpointKind::Space),
            other => Err(ChatError::Config(format!(
                "Unknown endpoint type '{other}'. Expected 'Inference API', 'Custom URL' or 'Space'"
            ))),
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::InferenceApi => write!(f, "Inference API"),
            EndpointKind::CustomUrl => write!(f, "Custom URL"),
            EndpointKind::Space => write!(f, "Space"),
        }
    }
}

impl EndpointKind {
    /// Resolve the URL requests for `model_id` go to. Custom and space
    /// endpoints are used verbatim.
    pub fn endpoint_for(self, model_id: &str, custom_url: Option<&str>) -> Option<String> {
        match self {
            EndpointKind::InferenceApi => Some(format!("{INFERENCE_API_BASE}/{model_id}")),
            EndpointKind::CustomUrl | EndpointKind::Space => custom_url
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        }
    }
}
