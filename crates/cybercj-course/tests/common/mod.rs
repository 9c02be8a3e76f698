#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use cybercj_course::chat::RenderedMessage;
use cybercj_course::quiz::{QuizScore, RenderedQuestion};
use cybercj_course::{
    ChatApi, ChatApiError, ChatConfig, ChatSession, ChatView, ContentFrame, QuizView, Timer,
};
use cybercj_types::{ChatReply, ChatRequest, FeedbackRating, FeedbackRequest, MessageId};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything a chat view was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Open(bool),
    Focus,
    ClearInput,
    InputEnabled(bool),
    Message(RenderedMessage),
    Typing(usize, String),
    TypingRemoved(usize),
    ClearTranscript,
    Feedback(MessageId, FeedbackRating, String),
}

#[derive(Default)]
pub struct RecordingView {
    events: RefCell<Vec<ViewEvent>>,
    typing_shown: Cell<usize>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    pub fn messages(&self) -> Vec<RenderedMessage> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Typing indicators shown but not yet removed
    pub fn open_typing(&self) -> Vec<usize> {
        let events = self.events.borrow();
        events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Typing(id, _) => Some(*id),
                _ => None,
            })
            .filter(|id| !events.contains(&ViewEvent::TypingRemoved(*id)))
            .collect()
    }

    pub fn typing_removed(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ViewEvent::TypingRemoved(_)))
            .count()
    }

    pub fn count(&self, wanted: &ViewEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == wanted).count()
    }

    fn record(&self, event: ViewEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ChatView for RecordingView {
    type Typing = usize;

    fn set_widget_open(&self, open: bool) {
        self.record(ViewEvent::Open(open));
    }

    fn focus_input(&self) {
        self.record(ViewEvent::Focus);
    }

    fn clear_input(&self) {
        self.record(ViewEvent::ClearInput);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.record(ViewEvent::InputEnabled(enabled));
    }

    fn append_message(&self, message: &RenderedMessage) {
        self.record(ViewEvent::Message(message.clone()));
    }

    fn show_typing(&self, label: &str) -> usize {
        let id = self.typing_shown.get() + 1;
        self.typing_shown.set(id);
        self.record(ViewEvent::Typing(id, label.to_string()));
        id
    }

    fn remove_typing(&self, typing: usize) {
        self.record(ViewEvent::TypingRemoved(typing));
    }

    fn clear_transcript(&self) {
        self.record(ViewEvent::ClearTranscript);
    }

    fn mark_feedback(&self, message_id: &MessageId, rating: FeedbackRating, label: &str) {
        self.record(ViewEvent::Feedback(message_id.clone(), rating, label.to_string()));
    }
}

/// Tutor stand-in answering from a script
#[derive(Default)]
pub struct ScriptedApi {
    replies: RefCell<VecDeque<Result<ChatReply, ChatApiError>>>,
    feedback_result: RefCell<Option<ChatApiError>>,
    pub requests: RefCell<Vec<ChatRequest>>,
    pub feedback: RefCell<Vec<FeedbackRequest>>,
}

impl ScriptedApi {
    pub fn replying(reply: Result<ChatReply, ChatApiError>) -> Self {
        let api = Self::default();
        api.replies.borrow_mut().push_back(reply);
        api
    }

    pub fn failing_feedback(self, error: ChatApiError) -> Self {
        *self.feedback_result.borrow_mut() = Some(error);
        self
    }
}

#[async_trait(?Send)]
impl ChatApi for ScriptedApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ChatApiError::Network("no scripted reply".to_string())))
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ChatApiError> {
        self.feedback.borrow_mut().push(request.clone());
        match self.feedback_result.borrow().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Timer that returns at once but remembers what it was asked for
#[derive(Default)]
pub struct InstantTimer {
    pub waits: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Timer for InstantTimer {
    async fn sleep(&self, duration: Duration) {
        self.waits.borrow_mut().push(duration);
    }
}

pub type TestSession = ChatSession<RecordingView, ScriptedApi, InstantTimer>;

pub fn session(api: ScriptedApi) -> TestSession {
    init_logging();
    let mut config = ChatConfig::default();
    config
        .module_prompts
        .insert("privacy".to_string(), "Teach me about **Privacy**.".to_string());
    ChatSession::new(RecordingView::default(), api, InstantTimer::default(), config)
}

pub fn reply(text: &str) -> Result<ChatReply, ChatApiError> {
    Ok(ChatReply {
        response: text.to_string(),
        system_message: None,
    })
}

/// Quiz page kept in memory
#[derive(Default)]
pub struct MemoryQuizPage {
    pub mounted: RefCell<Vec<usize>>,
    pub headings: RefCell<Vec<(usize, String)>>,
    pub questions: RefCell<Vec<RenderedQuestion>>,
    pub announced: RefCell<Vec<QuizScore>>,
    pub cleared: RefCell<Vec<String>>,
}

impl MemoryQuizPage {
    pub fn with_questions(questions: Vec<RenderedQuestion>) -> Self {
        let page = Self::default();
        *page.questions.borrow_mut() = questions;
        page
    }
}

impl QuizView for MemoryQuizPage {
    type Card = usize;

    fn base_heading(&self, card: &usize) -> String {
        format!(". Question {}", card)
    }

    fn set_heading(&self, card: &usize, heading: &str) {
        self.headings.borrow_mut().push((*card, heading.to_string()));
    }

    fn mount(&self, cards: &[usize]) {
        *self.mounted.borrow_mut() = cards.to_vec();
    }

    fn rendered_questions(&self, _quiz_id: &str) -> Vec<RenderedQuestion> {
        self.questions.borrow().clone()
    }

    fn announce_score(&self, _quiz_id: &str, score: &QuizScore) {
        self.announced.borrow_mut().push(*score);
    }

    fn clear_selections(&self, quiz_id: &str) {
        for question in self.questions.borrow_mut().iter_mut() {
            for input in question.inputs.iter_mut() {
                input.checked = false;
            }
        }
        self.cleared.borrow_mut().push(quiz_id.to_string());
    }
}

/// Content frame kept in memory, remembering every load
#[derive(Default)]
pub struct MemoryFrame {
    pub src: RefCell<Option<String>>,
    pub loads: RefCell<Vec<String>>,
}

impl MemoryFrame {
    pub fn showing(src: &str) -> Self {
        let frame = Self::default();
        *frame.src.borrow_mut() = Some(src.to_string());
        frame
    }
}

impl ContentFrame for MemoryFrame {
    fn source(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    fn set_source(&self, target: &str) {
        *self.src.borrow_mut() = Some(target.to_string());
        self.loads.borrow_mut().push(target.to_string());
    }
}
