use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use cybercj_course::chat::RenderedMessage;
use cybercj_course::markdown::MessageBody;
use cybercj_course::{ChatConfig, ChatSession, ChatView, HttpChatApi, Timer};
use cybercj_types::{FeedbackRating, MessageId, Role};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement};

use crate::dom;
use crate::utils;

type FeedbackHandler = Rc<dyn Fn(MessageId, FeedbackRating, String)>;

/// The chat widget as laid out on the course pages
pub struct DomChatView {
    document: Document,
    widget: Element,
    launcher: Element,
    messages: Element,
    input: HtmlInputElement,
    send_button: HtmlButtonElement,
    on_feedback: RefCell<Option<FeedbackHandler>>,
}

impl DomChatView {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            widget: dom::get_element_by_id(document, "chatbot-widget")?,
            launcher: dom::get_element_by_id(document, "chatbot-toggle")?,
            messages: dom::get_element_by_id(document, "chatbot-messages")?,
            input: dom::get_typed_by_id(document, "chatbot-input")?,
            send_button: dom::get_typed_by_id(document, "chatbot-send")?,
            on_feedback: RefCell::new(None),
        })
    }

    pub fn input_value(&self) -> String {
        self.input.value()
    }

    /// Route thumbs up/down clicks to `handler`
    pub fn set_feedback_handler(&self, handler: FeedbackHandler) {
        *self.on_feedback.borrow_mut() = Some(handler);
    }

    fn build_message(&self, message: &RenderedMessage) -> Result<Element, JsValue> {
        let class = format!("message {}", message_class(message.role, message.is_error));
        let div = dom::create_element_with_class(&self.document, "div", &class)?;
        div.set_attribute("data-message-id", message.id.as_str())?;
        div.set_attribute("style", "position: relative;")?;

        let content = dom::create_element_with_class(&self.document, "div", "message-content")?;
        match &message.body {
            MessageBody::Markup(html) => content.set_inner_html(html),
            MessageBody::Text(text) => content.set_text_content(Some(text)),
        }
        div.append_child(&content)?;

        if message.feedback {
            let container =
                dom::create_element_with_class(&self.document, "div", "feedback-container")?;
            for rating in [FeedbackRating::Positive, FeedbackRating::Negative] {
                let button = self.feedback_button(message, rating)?;
                container.append_child(&button)?;
            }
            div.append_child(&container)?;
        }

        Ok(div)
    }

    fn feedback_button(
        &self,
        message: &RenderedMessage,
        rating: FeedbackRating,
    ) -> Result<Element, JsValue> {
        let button = dom::create_element_with_class(&self.document, "button", "feedback-btn")?;
        button.set_attribute("data-rating", rating.as_str())?;
        let (icon, title) = match rating {
            FeedbackRating::Positive => ("👍", "Good response"),
            FeedbackRating::Negative => ("👎", "Poor response"),
        };
        button.set_text_content(Some(icon));
        button.set_attribute("title", title)?;

        let handler = self.on_feedback.borrow().clone();
        let id = message.id.clone();
        let text = message.source_text.clone();
        dom::add_click_listener(&button, move || {
            if let Some(handler) = &handler {
                handler(id.clone(), rating, text.clone());
            }
        })?;
        Ok(button)
    }
}

impl ChatView for DomChatView {
    type Typing = Option<Element>;

    fn set_widget_open(&self, open: bool) {
        let result = if open {
            self.widget
                .class_list()
                .add_1("open")
                .and_then(|_| self.launcher.class_list().add_1("hidden"))
        } else {
            self.widget
                .class_list()
                .remove_1("open")
                .and_then(|_| self.launcher.class_list().remove_1("hidden"))
        };
        if let Err(e) = result {
            log::error!("Failed to toggle chat widget: {:?}", e);
        }
    }

    fn focus_input(&self) {
        let _ = self.input.focus();
    }

    fn clear_input(&self) {
        self.input.set_value("");
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input.set_disabled(!enabled);
        self.send_button.set_disabled(!enabled);
    }

    fn append_message(&self, message: &RenderedMessage) {
        match self.build_message(message) {
            Ok(div) => {
                if let Err(e) = self.messages.append_child(&div) {
                    log::error!("Failed to append message: {:?}", e);
                }
                dom::scroll_to_bottom(&self.messages);
            }
            Err(e) => log::error!("Failed to render message {}: {:?}", message.id, e),
        }
    }

    fn show_typing(&self, label: &str) -> Option<Element> {
        let div = match dom::create_element_with_class(&self.document, "div", "message bot-message typing") {
            Ok(div) => div,
            Err(e) => {
                log::error!("Failed to show typing indicator: {:?}", e);
                return None;
            }
        };
        div.set_text_content(Some(label));
        self.messages.append_child(&div).ok()?;
        dom::scroll_to_bottom(&self.messages);
        Some(div)
    }

    fn remove_typing(&self, typing: Option<Element>) {
        if let Some(div) = typing {
            div.remove();
        }
    }

    fn clear_transcript(&self) {
        dom::clear_element(&self.messages);
    }

    fn mark_feedback(&self, message_id: &MessageId, rating: FeedbackRating, label: &str) {
        let selector = format!(r#"[data-message-id="{}"]"#, message_id);
        let Ok(Some(message)) = self.messages.query_selector(&selector) else {
            return;
        };

        if let Ok(buttons) = dom::query_all(&message, ".feedback-btn") {
            for button in buttons {
                let is_clicked = button.get_attribute("data-rating").as_deref() == Some(rating.as_str());
                let _ = button.class_list().toggle_with_force("active", is_clicked);
            }
        }

        let status = match message.query_selector(".feedback-status") {
            Ok(Some(status)) => Some(status),
            _ => dom::create_element_with_class(&self.document, "span", "feedback-status")
                .and_then(|span| message.append_child(&span).map(|_| span))
                .ok(),
        };
        if let Some(status) = status {
            status.set_text_content(Some(label));
        }
    }
}

/// CSS class carried by a transcript entry
pub fn message_class(role: Role, is_error: bool) -> &'static str {
    match (role, is_error) {
        (_, true) => "bot-message error",
        (Role::User, false) => "user-message",
        (Role::Bot, false) => "bot-message",
        (Role::System, false) => "system-message",
    }
}

/// Timer backed by `setTimeout`
pub struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

pub type DomChatSession = ChatSession<DomChatView, HttpChatApi, GlooTimer>;

pub struct ChatApp {
    document: Document,
    session: Rc<DomChatSession>,
}

impl ChatApp {
    pub fn new(config: ChatConfig) -> Result<Self, JsValue> {
        let document = utils::document()?;
        let endpoints = config
            .endpoints(&utils::page_origin()?)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let view = DomChatView::new(&document)?;
        let session = Rc::new(ChatSession::new(
            view,
            HttpChatApi::new(endpoints),
            GlooTimer,
            config,
        ));

        let weak: Weak<DomChatSession> = Rc::downgrade(&session);
        session.view().set_feedback_handler(Rc::new(move |id, rating, text| {
            let Some(session) = weak.upgrade() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                session.submit_feedback(&id, rating, &text).await;
            });
        }));

        Ok(Self { document, session })
    }

    pub fn start(self) -> Result<(), JsValue> {
        self.setup_toggle()?;
        self.setup_message_sender()?;
        self.setup_module_selector()?;
        self.setup_new_topic()?;

        let session = self.session.clone();
        wasm_bindgen_futures::spawn_local(async move {
            session.greet().await;
        });

        log::info!("Chat widget ready, conversation {}", self.session.conversation_id());
        Ok(())
    }

    fn setup_toggle(&self) -> Result<(), JsValue> {
        let launcher = dom::get_element_by_id(&self.document, "chatbot-toggle")?;
        let session = self.session.clone();
        dom::add_click_listener(&launcher, move || session.open())?;

        let close = dom::get_element_by_id(&self.document, "chatbot-close")?;
        let session = self.session.clone();
        dom::add_click_listener(&close, move || session.close())?;
        Ok(())
    }

    fn setup_message_sender(&self) -> Result<(), JsValue> {
        // Send button
        let send_btn = dom::get_element_by_id(&self.document, "chatbot-send")?;
        let session = self.session.clone();
        dom::add_click_listener(&send_btn, move || send_current_input(&session))?;

        // Enter key handler
        let input = dom::get_element_by_id(&self.document, "chatbot-input")?;
        let session = self.session.clone();
        dom::add_event_listener(&input, "keypress", move |event: web_sys::KeyboardEvent| {
            if event.key() == "Enter" {
                send_current_input(&session);
            }
        })?;

        Ok(())
    }

    fn setup_module_selector(&self) -> Result<(), JsValue> {
        let Some(selector) = self.document.get_element_by_id("module-selector") else {
            log::debug!("No module selector on this page");
            return Ok(());
        };
        let session = self.session.clone();
        dom::add_event_listener(&selector, "change", move |event: web_sys::Event| {
            let Some(select) = event
                .target()
                .and_then(|t| wasm_bindgen::JsCast::dyn_into::<HtmlSelectElement>(t).ok())
            else {
                return;
            };
            let module = select.value();
            if module.is_empty() {
                return;
            }
            select.set_value("");
            let session = session.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session.start_module(&module).await;
            });
        })
    }

    fn setup_new_topic(&self) -> Result<(), JsValue> {
        let button = dom::get_element_by_id(&self.document, "new-topic-btn")?;
        let session = self.session.clone();
        dom::add_click_listener(&button, move || {
            let session = session.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session.new_topic().await;
            });
        })
    }
}

fn send_current_input(session: &Rc<DomChatSession>) {
    let text = session.view().input_value();
    let session = session.clone();
    wasm_bindgen_futures::spawn_local(async move {
        session.send_message(&text).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_class() {
        assert_eq!(message_class(Role::User, false), "user-message");
        assert_eq!(message_class(Role::Bot, false), "bot-message");
        assert_eq!(message_class(Role::System, false), "system-message");
        assert_eq!(message_class(Role::Bot, true), "bot-message error");
    }
}
