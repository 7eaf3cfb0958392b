use thiserror::Error;

/// Errors raised inside the chat client.
///
/// Only configuration problems ever reach the binary. Everything the
/// inference client sees is folded into display text before it leaves
/// [`crate::client::InferenceClient`].
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ChatError::Timeout(e.to_string())
        } else {
            ChatError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
