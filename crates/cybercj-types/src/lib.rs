//! Core types for the CyberCJ course pages
//!
//! This crate holds the data model shared by the chat widget, the quiz engine
//! and the lesson navigator, plus the JSON shapes exchanged with the tutor API.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod course;
pub mod protocol;

pub use course::{AnswerKey, LessonMap, LessonMapError, QuizBank, QuizKey};
pub use protocol::{ChatReply, ChatRequest, ErrorBody, FeedbackRequest};

// ============================================================================
// Identifiers
// ============================================================================

/// Length of the random tail appended to generated identifiers
const RANDOM_SUFFIX_LEN: usize = 9;

/// Build a `<prefix>_<unix millis>_<random>` token
fn generate_token(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        &random[..RANDOM_SUFFIX_LEN]
    )
}

/// Opaque token correlating chat messages and feedback to one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn generate() -> Self {
        Self(generate_token("conv"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Identifier of a single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Sequential id for messages created locally (`msg_<n>`)
    pub fn local(counter: u64) -> Self {
        Self(format!("msg_{}", counter))
    }

    /// Fresh id for a reply coming back from the tutor
    pub fn generate() -> Self {
        Self(generate_token("msg"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
            Role::System => "system",
        }
    }

    /// Whether text from this author is interpreted as markdown
    pub fn renders_markdown(&self) -> bool {
        !matches!(self, Role::User)
    }
}

/// Learner's verdict on a bot reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackRating {
    Positive,
    Negative,
}

impl FeedbackRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackRating::Positive => "positive",
            FeedbackRating::Negative => "negative",
        }
    }

    /// Short label shown next to the buttons once the rating is recorded
    pub fn confirmation_label(&self) -> &'static str {
        match self {
            FeedbackRating::Positive => "✓ Helpful",
            FeedbackRating::Negative => "✓ Noted",
        }
    }
}

/// One entry of the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub feedback: Option<FeedbackRating>,
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    /// Bot replies that are not errors can be rated
    pub fn accepts_feedback(&self) -> bool {
        self.role == Role::Bot && !self.is_error
    }
}

// ============================================================================
// Conversation
// ============================================================================

/// In-memory transcript of one chat session
///
/// The counter behind `msg_<n>` ids keeps running across `restart` so ids
/// stay unique for the lifetime of the page.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<ChatMessage>,
    counter: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: ConversationId::generate(),
            messages: Vec::new(),
            counter: 0,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append a message, assigning a local id when none is given
    pub fn push(&mut self, role: Role, text: &str, id: Option<MessageId>) -> &ChatMessage {
        self.append(role, text, id, false)
    }

    /// Append an error-flavored bot message
    pub fn push_error(&mut self, text: &str) -> &ChatMessage {
        self.append(Role::Bot, text, None, true)
    }

    fn append(
        &mut self,
        role: Role,
        text: &str,
        id: Option<MessageId>,
        is_error: bool,
    ) -> &ChatMessage {
        self.counter += 1;
        let id = id.unwrap_or_else(|| MessageId::local(self.counter));
        let index = self.messages.len();
        self.messages.push(ChatMessage {
            id,
            role,
            text: text.to_string(),
            feedback: None,
            is_error,
        });
        &self.messages[index]
    }

    /// Start a new topic: fresh id, empty transcript
    pub fn restart(&mut self) {
        self.id = ConversationId::generate();
        self.messages.clear();
    }

    pub fn find(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Record a rating; returns false when the message is not in the transcript
    pub fn set_feedback(&mut self, id: &MessageId, rating: FeedbackRating) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(message) => {
                message.feedback = Some(rating);
                true
            }
            None => false,
        }
    }
}
