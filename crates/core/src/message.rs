//! Message and Transcript domain types.
//!
//! These are the core value objects that flow through the entire system:
//! the user sends a message → the assistant generates a response → function
//! results are folded back in as system messages → the final reply is
//! committed. The transcript is the model's entire context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions and function results
    System,
    /// The end user
    User,
    /// The movie assistant
    Assistant,
}

/// A single message in a transcript. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message (instruction prompt or function result).
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// An append-only, ordered sequence of messages owned by one session.
///
/// Index 0 is always the single seeding system message (the instruction
/// prompt); there is deliberately no API to edit or remove entries, so a
/// failed turn leaves the transcript at its last successful append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique session ID
    pub id: SessionId,

    /// Ordered messages; messages[0] is the instruction prompt
    pub messages: Vec<Message>,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a new transcript seeded with the instruction prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            messages: vec![Message::system(system_prompt)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message. The only mutation the transcript supports.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Number of messages, including the seeding system prompt.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently committed assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_seeds_system_prompt() {
        let t = Transcript::new("You are a movie assistant.");
        assert_eq!(t.len(), 1);
        assert_eq!(t.messages[0].role, Role::System);
        assert_eq!(t.messages[0].content, "You are a movie assistant.");
    }

    #[test]
    fn transcript_tracks_updates() {
        let mut t = Transcript::new("prompt");
        let created = t.created_at;

        t.push(Message::user("First message"));
        assert_eq!(t.len(), 2);
        assert!(t.updated_at >= created);
    }

    #[test]
    fn last_assistant_skips_later_roles() {
        let mut t = Transcript::new("prompt");
        t.push(Message::user("hi"));
        t.push(Message::assistant("hello!"));
        t.push(Message::user("more"));
        assert_eq!(t.last_assistant().unwrap().content, "hello!");
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"user""#));
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
    }
}
