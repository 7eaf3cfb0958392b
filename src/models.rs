use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// Inference API request body
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GenerationPayload {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Tunable generation knobs, adjustable from the REPL
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// How many prior messages are rendered into dialogue prompts
    pub history_window: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            temperature: 0.7,
            top_p: 0.9,
            history_window: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_skips_absent_parameters() {
        let payload = GenerationPayload {
            inputs: "Hi".to_string(),
            parameters: GenerationParameters {
                max_new_tokens: 150,
                temperature: 0.7,
                top_p: None,
                do_sample: true,
                return_full_text: None,
                stop: None,
            },
        };
        let json = serde_json::to_value(&payload).expect("payload serializes");
        let params = json["parameters"].as_object().expect("parameters object");
        assert_eq!(params.len(), 3);
        assert_eq!(params["max_new_tokens"], 150);
        assert_eq!(params["do_sample"], true);
        assert!(!params.contains_key("stop"));
    }

    #[test]
    fn test_message_constructors_tag_role() {
        assert_eq!(Message::user("hello").role, Role::User);
        let reply = Message::assistant("Good day.");
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "Good day.");
    }
}
