use uuid::Uuid;

use crate::catalog::EndpointKind;
use crate::client::{InferenceClient, TurnPhase};
use crate::config;
use crate::conversation::{ChatStats, Conversation};
use crate::error::{ChatError, Result};
use crate::models::GenerationSettings;
use crate::normalize::Reply;
use crate::payload::ModelFamily;
use crate::persona::Persona;

/// One interactive chat session.
///
/// Every mutation goes through `&mut self`, so only one turn can be in
/// flight and the conversation is never observed with a half-finished turn.
pub struct ChatSession {
    id: Uuid,
    conversation: Conversation,
    client: InferenceClient,
    persona: Persona,
    settings: GenerationSettings,
    model_id: String,
    endpoint_kind: EndpointKind,
    custom_url: Option<String>,
}

impl ChatSession {
    pub fn new(
        client: InferenceClient,
        persona: Persona,
        settings: GenerationSettings,
        model_id: String,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session = %id, model = %model_id, "Chat session started");
        Self {
            id,
            conversation: Conversation::new(),
            client,
            persona,
            settings,
            model_id,
            endpoint_kind: EndpointKind::InferenceApi,
            custom_url: None,
        }
    }

    /// Remember how endpoints are resolved so model switches keep pointing
    /// at the right place.
    pub fn with_endpoint(mut self, kind: EndpointKind, custom_url: Option<String>) -> Self {
        self.endpoint_kind = kind;
        self.custom_url = custom_url;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn endpoint_kind(&self) -> EndpointKind {
        self.endpoint_kind
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn stats(&self) -> ChatStats {
        self.conversation.stats()
    }

    pub async fn submit(&mut self, text: &str) -> Reply {
        self.submit_with(text, |_| {}).await
    }

    /// Run one turn: build the payload from history plus the new message,
    /// call the model, then record both messages together.
    pub async fn submit_with<F>(&mut self, text: &str, mut on_phase: F) -> Reply
    where
        F: FnMut(TurnPhase) + Send,
    {
        let family = ModelFamily::for_model(&self.model_id);
        let payload =
            family.build_payload(&self.persona, &self.conversation, text, &self.settings);
        tracing::info!(
            session = %self.id,
            model = %self.model_id,
            ?family,
            history = self.conversation.len(),
            "Processing turn"
        );

        let reply = self.client.generate(&payload, &mut on_phase).await;
        if let Some(notice) = &reply.notice {
            tracing::warn!(session = %self.id, outcome = ?reply.outcome, "{}", notice);
        }

        self.conversation.push_turn(text, reply.text.clone());
        on_phase(TurnPhase::Idle);
        reply
    }

    pub fn clear(&mut self) {
        tracing::info!(session = %self.id, dropped = self.conversation.len(), "History cleared");
        self.conversation.clear();
    }

    pub fn select_model(&mut self, model_id: &str) -> Result<()> {
        let endpoint = self
            .endpoint_kind
            .endpoint_for(model_id, self.custom_url.as_deref())
            .ok_or_else(|| {
                ChatError::Config(format!(
                    "Endpoint type '{}' has no URL configured",
                    self.endpoint_kind
                ))
            })?;
        tracing::info!(session = %self.id, model = %model_id, %endpoint, "Model selected");
        self.model_id = model_id.to_string();
        self.client.set_endpoint(endpoint);
        Ok(())
    }

    /// Replace generation settings after range-checking them
    pub fn update_settings(&mut self, settings: GenerationSettings) -> Result<()> {
        config::validate_generation(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub async fn test_model(&self) -> bool {
        self.client.probe().await
    }
}
