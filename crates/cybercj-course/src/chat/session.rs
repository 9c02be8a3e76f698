use std::cell::RefCell;

use cybercj_types::{
    ChatMessage, ChatRequest, Conversation, ConversationId, FeedbackRating, FeedbackRequest,
    MessageId, Role,
};

use super::api::{ChatApi, ChatApiError};
use super::{ChatView, RenderedMessage, Timer};
use crate::config::ChatConfig;
use crate::markdown::{self, MessageBody};

/// How one `send_message` call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was sent
    Skipped,
    /// The tutor answered; carries the id given to the reply
    Replied(MessageId),
    /// The server answered with a non-2xx status
    HttpError(u16),
    /// The request failed or the reply was unreadable
    NetworkError,
}

/// Disables the input for its lifetime; re-enables and refocuses on drop
struct InputLock<'a, V: ChatView> {
    view: &'a V,
}

impl<'a, V: ChatView> InputLock<'a, V> {
    fn engage(view: &'a V) -> Self {
        view.set_input_enabled(false);
        Self { view }
    }
}

impl<V: ChatView> Drop for InputLock<'_, V> {
    fn drop(&mut self) {
        self.view.set_input_enabled(true);
        self.view.focus_input();
    }
}

struct ChatState {
    conversation: Conversation,
    open: bool,
}

/// One chat widget: its conversation, its view and its connection to the tutor
///
/// All methods take `&self` so the session can be shared between event
/// handlers; state borrows never span an `.await`.
pub struct ChatSession<V, A, T> {
    view: V,
    api: A,
    timer: T,
    config: ChatConfig,
    state: RefCell<ChatState>,
}

impl<V: ChatView, A: ChatApi, T: Timer> ChatSession<V, A, T> {
    pub fn new(view: V, api: A, timer: T, config: ChatConfig) -> Self {
        Self {
            view,
            api,
            timer,
            config,
            state: RefCell::new(ChatState {
                conversation: Conversation::new(),
                open: false,
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.state.borrow().conversation.id().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().conversation.messages().to_vec()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn open(&self) {
        self.state.borrow_mut().open = true;
        self.view.set_widget_open(true);
        self.view.focus_input();
    }

    pub fn close(&self) {
        self.state.borrow_mut().open = false;
        self.view.set_widget_open(false);
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Post the assistant's welcome after the configured delay
    pub async fn greet(&self) {
        self.timer.sleep(self.config.welcome_delay()).await;
        self.post(Role::Bot, &self.config.welcome_message, None);
    }

    /// Send the learner's text to the tutor and render the outcome
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SendOutcome::Skipped;
        }

        self.post(Role::User, question, None);
        self.view.clear_input();

        let _lock = InputLock::engage(&self.view);
        let typing = self.view.show_typing(&self.config.typing_label);

        let request = ChatRequest {
            message: question.to_string(),
            conversation_id: self.conversation_id(),
        };
        let result = self.api.send_message(&request).await;
        self.view.remove_typing(typing);

        match result {
            Ok(reply) => {
                if let Some(system) = reply.system_message() {
                    self.post(Role::System, system, None);
                }
                let id = MessageId::generate();
                self.post(Role::Bot, &reply.response, Some(id.clone()));
                log::info!("Tutor replied in {} as {}", request.conversation_id, id);
                SendOutcome::Replied(id)
            }
            Err(ChatApiError::Http { status, message }) => {
                log::error!("Chat API error {}: {}", status, message);
                self.post_error(&message);
                SendOutcome::HttpError(status)
            }
            Err(e) => {
                log::error!("Chat request failed: {}", e);
                self.post_error(&self.config.connection_error_message);
                SendOutcome::NetworkError
            }
        }
    }

    /// Send the preset prompt for a course module; unknown keys are ignored
    pub async fn start_module(&self, module: &str) -> SendOutcome {
        match self.config.module_prompts.get(module) {
            Some(prompt) => self.send_message(prompt).await,
            None => {
                if !module.is_empty() {
                    log::warn!("No prompt for module {:?}", module);
                }
                SendOutcome::Skipped
            }
        }
    }

    /// Report a rating for a bot reply; failures are logged, never shown
    pub async fn submit_feedback(
        &self,
        message_id: &MessageId,
        rating: FeedbackRating,
        response_text: &str,
    ) -> bool {
        let request = FeedbackRequest::new(
            message_id.clone(),
            self.conversation_id(),
            rating,
            response_text,
        );

        match self.api.submit_feedback(&request).await {
            Ok(()) => {
                self.state
                    .borrow_mut()
                    .conversation
                    .set_feedback(message_id, rating);
                self.view
                    .mark_feedback(message_id, rating, rating.confirmation_label());
                log::info!("Recorded {} feedback for {}", rating.as_str(), message_id);
                true
            }
            Err(e) => {
                log::error!("Feedback submission error: {}", e);
                false
            }
        }
    }

    /// Start over with a fresh conversation id and greet after a short pause
    pub async fn new_topic(&self) {
        self.state.borrow_mut().conversation.restart();
        self.view.clear_transcript();
        log::info!("New topic, conversation {}", self.conversation_id());

        self.timer.sleep(self.config.new_topic_delay()).await;
        self.post(Role::System, &self.config.new_topic_message, None);
    }

    fn post(&self, role: Role, text: &str, id: Option<MessageId>) {
        let rendered = {
            let mut state = self.state.borrow_mut();
            let message = state.conversation.push(role, text, id);
            render(message)
        };
        self.view.append_message(&rendered);
    }

    fn post_error(&self, text: &str) {
        let rendered = {
            let mut state = self.state.borrow_mut();
            render(state.conversation.push_error(text))
        };
        self.view.append_message(&rendered);
    }
}

fn render(message: &ChatMessage) -> RenderedMessage {
    // error text may echo server output, keep it literal
    let body = if message.is_error {
        MessageBody::Text(message.text.clone())
    } else {
        markdown::render_message_content(message.role, &message.text)
    };
    RenderedMessage {
        id: message.id.clone(),
        role: message.role,
        body,
        is_error: message.is_error,
        feedback: message.accepts_feedback(),
        source_text: message.text.clone(),
    }
}
