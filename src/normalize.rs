//! Reduce the reply shapes hosted models return into one display string.

use serde_json::Value;

pub const ERROR_REPLY: &str =
    "I encountered an error while processing your request. Please try again or try a different model.";
pub const CONNECTIVITY_REPLY: &str =
    "I apologize, but I'm experiencing some connectivity issues at the moment. Please try again shortly.";
pub const MODEL_UNAVAILABLE_REPLY: &str =
    "The selected model appears to be unavailable. Please try selecting a different model.";
pub const BAD_FORMAT_REPLY: &str =
    "I received an unexpected response format. Please check your configuration.";
pub const REPHRASE_REPLY: &str =
    "I apologize, but I seem to have encountered a brief processing delay. Could you please rephrase your query?";
pub const UNEXPECTED_REPLY: &str =
    "Something unexpected occurred. Let me try to assist you differently.";

/// How a turn ended, for the UI's status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Success,
    ProviderError,
    BadFormat,
    ModelUnavailable,
    Connectivity,
    Unexpected,
}

/// Display text for one turn. Always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub outcome: TurnOutcome,
    /// Short status line for the UI when something went wrong
    pub notice: Option<String>,
}

impl Reply {
    pub fn success(text: String) -> Self {
        Self {
            text,
            outcome: TurnOutcome::Success,
            notice: None,
        }
    }

    pub fn degraded(text: &str, outcome: TurnOutcome, notice: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            outcome,
            notice: Some(notice.into()),
        }
    }
}

/// Text pulled out of a reply body before cleanup
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Text(String),
    ProviderError(String),
    /// No known shape matched; carries the body rendered as JSON
    Unrecognized(String),
}

fn field_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn extract(body: &Value) -> Extracted {
    match body {
        Value::Array(items) => {
            if let Some(first) = items.first() {
                if let Some(text) = first.get("generated_text") {
                    return Extracted::Text(field_text(text));
                }
                if let Some(text) = first.get("text") {
                    return Extracted::Text(field_text(text));
                }
            }
        }
        Value::Object(obj) => {
            for key in ["generated_text", "response", "text"] {
                if let Some(text) = obj.get(key) {
                    return Extracted::Text(field_text(text));
                }
            }
            if let Some(err) = obj.get("error") {
                return Extracted::ProviderError(field_text(err));
            }
        }
        _ => {}
    }
    Extracted::Unrecognized(body.to_string())
}

/// Drop an echoed prompt and a leading role label. Falls back to
/// [`REPHRASE_REPLY`] when nothing is left.
pub fn clean(text: &str, prompt: &str, prefixes: &[String]) -> String {
    let without_prompt = if !prompt.is_empty() && text.contains(prompt) {
        text.replace(prompt, "")
    } else {
        text.to_string()
    };

    let mut reply = without_prompt.trim();
    for prefix in prefixes {
        if let Some(rest) = reply.strip_prefix(prefix.as_str()) {
            reply = rest.trim();
            break;
        }
    }

    if reply.is_empty() {
        REPHRASE_REPLY.to_string()
    } else {
        reply.to_string()
    }
}

pub fn normalize(body: &Value, prompt: &str, prefixes: &[String]) -> Reply {
    match extract(body) {
        Extracted::Text(text) => Reply::success(clean(&text, prompt, prefixes)),
        Extracted::Unrecognized(raw) => {
            tracing::debug!(body = %raw, "Unrecognized response shape, rendering raw body");
            Reply::success(clean(&raw, prompt, prefixes))
        }
        Extracted::ProviderError(err) => {
            tracing::warn!(error = %err, "Provider reported an error");
            Reply::degraded(
                ERROR_REPLY,
                TurnOutcome::ProviderError,
                format!("API Error: {err}"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;
    use serde_json::json;

    fn prefixes() -> Vec<String> {
        Persona::jarvis().reply_prefixes()
    }

    #[test]
    fn test_extract_shapes_in_order() {
        assert_eq!(
            extract(&json!([{"generated_text": "a", "text": "b"}])),
            Extracted::Text("a".into())
        );
        assert_eq!(extract(&json!([{"text": "b"}])), Extracted::Text("b".into()));
        assert_eq!(
            extract(&json!({"generated_text": "c", "response": "d"})),
            Extracted::Text("c".into())
        );
        assert_eq!(
            extract(&json!({"response": "d", "text": "e"})),
            Extracted::Text("d".into())
        );
        assert_eq!(extract(&json!({"text": "e"})), Extracted::Text("e".into()));
        assert_eq!(
            extract(&json!({"error": "model too busy"})),
            Extracted::ProviderError("model too busy".into())
        );
    }

    #[test]
    fn test_extract_fallback_renders_body() {
        assert_eq!(
            extract(&json!({"answer": 42})),
            Extracted::Unrecognized(r#"{"answer":42}"#.into())
        );
        assert_eq!(extract(&json!([])), Extracted::Unrecognized("[]".into()));
        assert_eq!(
            extract(&json!([{"label": "x"}])),
            Extracted::Unrecognized(r#"[{"label":"x"}]"#.into())
        );
        assert_eq!(extract(&json!("plain")), Extracted::Unrecognized(r#""plain""#.into()));
    }

    #[test]
    fn test_non_string_field_is_rendered() {
        assert_eq!(extract(&json!({"text": 7})), Extracted::Text("7".into()));
    }

    #[test]
    fn test_normalize_strips_echoed_prompt() {
        let body = json!([{"generated_text": "<prompt>Hello there"}]);
        let reply = normalize(&body, "<prompt>", &prefixes());
        assert_eq!(reply.text, "Hello there");
        assert_eq!(reply.outcome, TurnOutcome::Success);
        assert_eq!(reply.notice, None);
    }

    #[test]
    fn test_normalize_strips_every_prompt_echo() {
        let body = json!([{"generated_text": "PROMPT Hello PROMPT"}]);
        let reply = normalize(&body, "PROMPT", &[]);
        assert_eq!(reply.text, "Hello");
    }

    #[test]
    fn test_normalize_provider_error_is_canned() {
        let body = json!({"error": "model too busy"});
        let reply = normalize(&body, "prompt", &prefixes());
        assert_eq!(reply.text, ERROR_REPLY);
        assert!(!reply.text.contains("model too busy"));
        assert_eq!(reply.outcome, TurnOutcome::ProviderError);
        assert_eq!(reply.notice.as_deref(), Some("API Error: model too busy"));
    }

    #[test]
    fn test_normalize_strips_role_label() {
        let body = json!({"generated_text": "Bot: Hi!"});
        let reply = normalize(&body, "unrelated prompt", &prefixes());
        assert_eq!(reply.text, "Hi!");
    }

    #[test]
    fn test_clean_strips_only_one_prefix() {
        let cleaned = clean("J.A.R.V.I.S.: Answer: indeed", "", &prefixes());
        assert_eq!(cleaned, "Answer: indeed");
    }

    #[test]
    fn test_clean_leaves_inner_labels() {
        assert_eq!(clean("Well, AI: is broad.", "", &prefixes()), "Well, AI: is broad.");
    }

    #[test]
    fn test_empty_results_ask_to_rephrase() {
        assert_eq!(clean("   \n", "", &prefixes()), REPHRASE_REPLY);
        assert_eq!(clean("<prompt>", "<prompt>", &prefixes()), REPHRASE_REPLY);
        assert_eq!(clean("Assistant:   ", "", &prefixes()), REPHRASE_REPLY);
        let reply = normalize(&json!({"text": ""}), "p", &prefixes());
        assert_eq!(reply.text, REPHRASE_REPLY);
    }
}
