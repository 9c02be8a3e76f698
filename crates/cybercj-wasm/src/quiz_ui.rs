use cybercj_course::quiz::{ChoiceInput, InputKind, QuizScore, RenderedQuestion};
use cybercj_course::{QuizEngine, QuizView};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlInputElement};

use crate::dom;
use crate::utils;

const BASE_HEADING_ATTR: &str = "data-base-heading";

/// A quiz page: `.question` blocks with an `h4` heading, inside one container
pub struct DomQuizView {
    document: Document,
    container: Element,
    submit: Option<Element>,
}

impl DomQuizView {
    /// Find the question pool and its container; `None` when the page has no quiz
    pub fn discover(document: &Document) -> Result<Option<(Self, Vec<Element>)>, JsValue> {
        let pool = dom::query_document(document, ".question")?;
        let Some(container) = pool.first().and_then(|q| q.parent_element()) else {
            return Ok(None);
        };
        let view = Self {
            document: document.clone(),
            container,
            submit: document.get_element_by_id("quiz-submit"),
        };
        Ok(Some((view, pool)))
    }

    /// The element with id `quiz_id`; an unknown id grades as an empty quiz
    fn quiz_root(&self, quiz_id: &str) -> Option<Element> {
        let root = self.document.get_element_by_id(quiz_id);
        if root.is_none() {
            log::warn!("No quiz container with id {}", quiz_id);
        }
        root
    }
}

impl QuizView for DomQuizView {
    type Card = Element;

    fn base_heading(&self, card: &Element) -> String {
        let Ok(Some(heading)) = card.query_selector("h4") else {
            return String::new();
        };
        if let Some(base) = heading.get_attribute(BASE_HEADING_ATTR) {
            return base;
        }
        let base = heading.text_content().unwrap_or_default();
        let _ = heading.set_attribute(BASE_HEADING_ATTR, &base);
        base
    }

    fn set_heading(&self, card: &Element, heading: &str) {
        if let Ok(Some(h4)) = card.query_selector("h4") {
            h4.set_text_content(Some(heading));
        }
    }

    fn mount(&self, cards: &[Element]) {
        dom::clear_element(&self.container);
        for card in cards {
            dom::reset_display(card);
            if let Err(e) = self.container.append_child(card) {
                log::error!("Failed to mount question: {:?}", e);
            }
        }
        if let Some(submit) = &self.submit {
            let _ = self.container.append_child(submit);
        }
    }

    fn rendered_questions(&self, quiz_id: &str) -> Vec<RenderedQuestion> {
        let Some(root) = self.quiz_root(quiz_id) else {
            return Vec::new();
        };
        dom::query_all(&root, ".question")
            .unwrap_or_default()
            .iter()
            .map(|question| RenderedQuestion {
                inputs: dom::choice_inputs(question)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(read_choice)
                    .collect(),
            })
            .collect()
    }

    fn announce_score(&self, _quiz_id: &str, score: &QuizScore) {
        utils::alert(&score.to_string());
    }

    fn clear_selections(&self, quiz_id: &str) {
        let Some(root) = self.quiz_root(quiz_id) else {
            return;
        };
        for input in dom::choice_inputs(&root).unwrap_or_default() {
            input.set_checked(false);
        }
    }
}

fn read_choice(input: &HtmlInputElement) -> Option<ChoiceInput> {
    let kind = match input.type_().as_str() {
        "radio" => InputKind::Radio,
        "checkbox" => InputKind::Checkbox,
        _ => return None,
    };
    // the visible text is the label right after the input
    let label = input
        .next_element_sibling()
        .filter(|el| el.tag_name().eq_ignore_ascii_case("label"))
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    Some(ChoiceInput {
        kind,
        name: input.name(),
        value: input.value(),
        label,
        checked: input.checked(),
    })
}

/// Quiz engine bound to the page, keeping the full question pool between setups
pub struct QuizPage {
    engine: QuizEngine,
    view: DomQuizView,
    pool: Vec<Element>,
}

impl QuizPage {
    pub fn new(engine: QuizEngine, view: DomQuizView, pool: Vec<Element>) -> Self {
        Self { engine, view, pool }
    }

    pub fn setup(&self) {
        let selected = self
            .engine
            .setup_quiz(&self.view, &self.pool, &mut rand::thread_rng());
        log::info!("Quiz shows {} questions", selected.len());
    }

    pub fn submit(&self, quiz_id: &str) -> QuizScore {
        self.engine.submit_quiz(quiz_id, &self.view)
    }
}
