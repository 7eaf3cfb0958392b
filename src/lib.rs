pub mod catalog;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod normalize;
pub mod payload;
pub mod persona;
pub mod repl;
pub mod session;
pub mod transport;
pub mod visual;

use std::sync::Arc;

use crate::client::InferenceClient;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::persona::Persona;
use crate::session::ChatSession;
use crate::transport::{HttpTransport, Transport};

/// Wire a session from validated configuration
pub fn build_session(cfg: &Config) -> Result<ChatSession> {
    cfg.validate()?;
    let endpoint = cfg
        .endpoint()
        .ok_or_else(|| ChatError::Config("No endpoint could be resolved".into()))?;
    let transport = Arc::new(HttpTransport::new()?);
    let persona = Persona::jarvis();

    let client = InferenceClient::new(
        transport as Arc<dyn Transport>,
        endpoint,
        cfg.hub.token.clone(),
        cfg.client_options(),
    )
    .with_reply_prefixes(persona.reply_prefixes());

    Ok(ChatSession::new(client, persona, cfg.generation, cfg.hub.model.clone())
        .with_endpoint(cfg.hub.endpoint_type, cfg.hub.custom_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_session_requires_token() {
        assert!(matches!(
            build_session(&Config::default()),
            Err(ChatError::Config(_))
        ));
    }

    #[test]
    fn test_build_session_from_config() {
        let mut cfg = Config::default();
        cfg.hub.token = "hf_test".to_string();
        cfg.hub.model = "google/flan-t5-large".to_string();
        let session = build_session(&cfg).expect("valid config builds a session");
        assert_eq!(session.model_id(), "google/flan-t5-large");
        assert!(session.conversation().is_empty());
        assert_eq!(
            session.endpoint(),
            "https://api-inference.huggingface.co/models/google/flan-t5-large"
        );
    }
}
