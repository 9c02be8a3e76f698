//! Chat widget: conversation state, tutor API client and the view port

use async_trait::async_trait;
use std::time::Duration;

use cybercj_types::{FeedbackRating, MessageId, Role};

use crate::markdown::MessageBody;

pub mod api;
pub mod session;

pub use api::{ChatApi, ChatApiError, HttpChatApi};
pub use session::{ChatSession, SendOutcome};

/// A transcript entry as the view should draw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: MessageId,
    pub role: Role,
    pub body: MessageBody,
    pub is_error: bool,
    /// Draw thumbs up/down controls for this entry
    pub feedback: bool,
    /// Original text, sent back with any feedback
    pub source_text: String,
}

/// Everything the chat widget needs from the page
pub trait ChatView {
    /// Handle to one typing indicator
    type Typing;

    /// Show or hide the widget; the launcher button does the opposite
    fn set_widget_open(&self, open: bool);
    fn focus_input(&self);
    fn clear_input(&self);
    /// Enable or disable both the text input and the send button
    fn set_input_enabled(&self, enabled: bool);
    fn append_message(&self, message: &RenderedMessage);
    /// Add a typing indicator; each call gets its own
    fn show_typing(&self, label: &str) -> Self::Typing;
    fn remove_typing(&self, typing: Self::Typing);
    fn clear_transcript(&self);
    /// Mark `rating` as the active feedback button and show `label`
    fn mark_feedback(&self, message_id: &MessageId, rating: FeedbackRating, label: &str);
}

/// Deferred work (welcome message, new topic greeting)
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}
