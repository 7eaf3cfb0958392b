use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{ChatError, Result};
use crate::models::GenerationPayload;
use crate::normalize::{
    BAD_FORMAT_REPLY, CONNECTIVITY_REPLY, MODEL_UNAVAILABLE_REPLY, Reply, TurnOutcome,
    UNEXPECTED_REPLY, normalize,
};
use crate::persona::Persona;
use crate::transport::{HttpReply, HttpRequest, Transport};

/// Status the hosted API answers with while a model is being loaded
const WARMING_UP_STATUS: u16 = 503;
const NOT_FOUND_STATUS: u16 = 404;

#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
    pub warmup_backoff: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            warmup_backoff: Duration::from_secs(20),
        }
    }
}

/// Progress of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
    WarmingUp,
    RetrySending,
    Done,
}

/// Talks to one inference endpoint and always hands back display text.
pub struct InferenceClient {
    tx: Arc<dyn Transport>,
    endpoint: String,
    token: String,
    options: ClientOptions,
    reply_prefixes: Vec<String>,
}

impl InferenceClient {
    pub fn new(
        tx: Arc<dyn Transport>,
        endpoint: String,
        token: String,
        options: ClientOptions,
    ) -> Self {
        Self {
            tx,
            endpoint,
            token,
            options,
            reply_prefixes: Persona::jarvis().reply_prefixes(),
        }
    }

    pub fn with_reply_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.reply_prefixes = prefixes;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    fn request(&self, body: serde_json::Value, timeout: Duration) -> HttpRequest {
        HttpRequest {
            url: self.endpoint.clone(),
            bearer_token: self.token.clone(),
            body,
            timeout,
        }
    }

    /// Send `payload` and reduce whatever comes back to display text.
    /// Failures never escape; they become canned replies with a notice.
    pub async fn generate<F>(&self, payload: &GenerationPayload, mut on_phase: F) -> Reply
    where
        F: FnMut(TurnPhase) + Send,
    {
        let reply = match self.exchange(payload, &mut on_phase).await {
            Ok(http) => self.interpret(http, &payload.inputs),
            Err(e) => absorb(e),
        };
        on_phase(TurnPhase::Done);
        reply
    }

    /// One POST, plus a single retry after a warm-up backoff.
    async fn exchange<F>(&self, payload: &GenerationPayload, on_phase: &mut F) -> Result<HttpReply>
    where
        F: FnMut(TurnPhase) + Send,
    {
        let body = serde_json::to_value(payload)
            .map_err(|e| ChatError::Internal(format!("Failed to encode payload: {e}")))?;
        let req = self.request(body, self.options.request_timeout);

        on_phase(TurnPhase::Sending);
        let reply = self.tx.post_json(&req).await?;
        if reply.status != WARMING_UP_STATUS {
            return Ok(reply);
        }

        tracing::warn!(
            endpoint = %self.endpoint,
            backoff_secs = self.options.warmup_backoff.as_secs(),
            "Model is loading, retrying once"
        );
        on_phase(TurnPhase::WarmingUp);
        sleep(self.options.warmup_backoff).await;
        on_phase(TurnPhase::RetrySending);
        self.tx.post_json(&req).await
    }

    fn interpret(&self, http: HttpReply, prompt: &str) -> Reply {
        if http.status == NOT_FOUND_STATUS {
            tracing::error!(endpoint = %self.endpoint, "Model not found");
            return Reply::degraded(
                MODEL_UNAVAILABLE_REPLY,
                TurnOutcome::ModelUnavailable,
                "Model not found. Please check if the model exists and is accessible.",
            );
        }
        if !http.is_success() {
            tracing::error!(
                status = http.status,
                body = %http.body,
                "Inference API request failed"
            );
            return Reply::degraded(
                CONNECTIVITY_REPLY,
                TurnOutcome::Connectivity,
                format!("API Request Error: HTTP {}", http.status),
            );
        }

        match serde_json::from_str::<serde_json::Value>(&http.body) {
            Ok(body) => normalize(&body, prompt, &self.reply_prefixes),
            Err(e) => {
                tracing::error!(error = %e, "Invalid JSON response from API");
                Reply::degraded(
                    BAD_FORMAT_REPLY,
                    TurnOutcome::BadFormat,
                    "Error: Invalid JSON response from API",
                )
            }
        }
    }

    /// Check that the endpoint answers. A loading model counts as available.
    pub async fn probe(&self) -> bool {
        let body = serde_json::json!({"inputs": "Hello", "parameters": {"max_new_tokens": 1}});
        let req = self.request(body, self.options.probe_timeout);
        match self.tx.post_json(&req).await {
            Ok(reply) => {
                tracing::info!(endpoint = %self.endpoint, status = reply.status, "Probe finished");
                reply.status == 200 || reply.status == WARMING_UP_STATUS
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Probe failed");
                false
            }
        }
    }
}

fn absorb(e: ChatError) -> Reply {
    match e {
        ChatError::Timeout(msg) => {
            tracing::error!(error = %msg, "Request timed out");
            Reply::degraded(
                CONNECTIVITY_REPLY,
                TurnOutcome::Connectivity,
                "Request timed out. The model might be busy.",
            )
        }
        ChatError::Transport(msg) => {
            tracing::error!(error = %msg, "Inference API request failed");
            Reply::degraded(
                CONNECTIVITY_REPLY,
                TurnOutcome::Connectivity,
                format!("API Request Error: {msg}"),
            )
        }
        other => {
            tracing::error!(error = %other, "Unexpected error during turn");
            Reply::degraded(
                UNEXPECTED_REPLY,
                TurnOutcome::Unexpected,
                format!("Unexpected Error: {other}"),
            )
        }
    }
}
