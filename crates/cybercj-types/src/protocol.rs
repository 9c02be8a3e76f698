use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConversationId, FeedbackRating, MessageId};

/// Fallback error text when a failed response carries no readable body
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Body of `POST /chat_multi_agent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: ConversationId,
}

/// Successful tutor reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

impl ChatReply {
    /// System note to render before the reply, if the server sent a non-empty one
    pub fn system_message(&self) -> Option<&str> {
        self.system_message.as_deref().filter(|s| !s.is_empty())
    }
}

/// Body of a non-2xx chat response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Stand-in used when the error body is not valid JSON
    pub fn unknown() -> Self {
        Self {
            error: Some(UNKNOWN_ERROR.to_string()),
        }
    }

    /// Server text if present, otherwise `Error: <status text>`
    pub fn message_or(&self, status_text: &str) -> String {
        match self.error.as_deref().filter(|e| !e.is_empty()) {
            Some(error) => error.to_string(),
            None => format!("Error: {}", status_text),
        }
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub rating: FeedbackRating,
    pub response_text: String,
    pub timestamp: String,
}

impl FeedbackRequest {
    /// Build a request stamped with the current time (ISO-8601, millisecond precision)
    pub fn new(
        message_id: MessageId,
        conversation_id: ConversationId,
        rating: FeedbackRating,
        response_text: &str,
    ) -> Self {
        Self {
            message_id,
            conversation_id,
            rating,
            response_text: response_text.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
