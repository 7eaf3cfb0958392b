use crate::models::{Message, Role};

/// Ordered message history for one interactive session.
///
/// Lives exactly as long as the session that owns it. Messages are only ever
/// appended or cleared in bulk.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

/// Numbers shown by the `/stats` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatStats {
    pub messages: usize,
    pub conversations: usize,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Append a user message and its reply together.
    pub fn push_turn(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.messages.reserve(2);
        self.append(Role::User, user);
        self.append(Role::Assistant, reply);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Last `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn stats(&self) -> ChatStats {
        ChatStats {
            messages: self.messages.len(),
            conversations: self.messages.len() / 2,
        }
    }
}
