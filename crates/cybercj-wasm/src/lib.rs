use std::cell::RefCell;

use cybercj_course::{CourseConfig, LessonNavigator, QuizEngine};
use wasm_bindgen::prelude::*;

mod chat_ui;
mod dom;
mod nav_ui;
mod popup_ui;
mod quiz_ui;
mod utils;

use nav_ui::DomFrame;
use quiz_ui::{DomQuizView, QuizPage};

thread_local! {
    static NAVIGATOR: RefCell<Option<LessonNavigator<DomFrame>>> = const { RefCell::new(None) };
    static QUIZ: RefCell<Option<QuizPage>> = const { RefCell::new(None) };
}

/// Initialize the WASM application
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("CyberCJ WASM initialized");
}

fn course_config() -> Result<CourseConfig, JsValue> {
    CourseConfig::bundled().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Set up the CJ-Mentor chat widget on the current page
#[wasm_bindgen]
pub fn init_chatbot() -> Result<(), JsValue> {
    let config = course_config()?;
    chat_ui::ChatApp::new(config.chat)?.start()
}

/// Drive the `#module` frame with `#next`/`#back` over the lesson map of `course`
#[wasm_bindgen]
pub fn init_navigator(course: String) -> Result<(), JsValue> {
    let config = course_config()?;
    let map = config
        .lesson_map(&course)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .clone();
    let document = utils::document()?;
    let frame = DomFrame::new(&document)?;
    log::info!("Navigator for {} with {} pages", course, map.len());
    NAVIGATOR.with(|nav| *nav.borrow_mut() = Some(LessonNavigator::new(map, frame)));

    let next = dom::get_element_by_id(&document, "next")?;
    dom::add_click_listener(&next, || with_navigator(|nav| nav.next()))?;
    let back = dom::get_element_by_id(&document, "back")?;
    dom::add_click_listener(&back, || with_navigator(|nav| nav.back()))?;

    nav_ui::keep_submenu_open(&document)?;
    popup_ui::wire_live_preview(&document, &config.popup)?;
    Ok(())
}

/// Jump to a lesson index, or load any other URL in the content frame
#[wasm_bindgen(js_name = navigateTo)]
pub fn navigate_to(key: JsValue) {
    match utils::nav_key(&key) {
        Some(key) => with_navigator(|nav| nav.navigate_to(&key)),
        None => log::warn!("Ignoring navigation key {:?}", key),
    }
}

fn with_navigator(f: impl FnOnce(&mut LessonNavigator<DomFrame>)) {
    NAVIGATOR.with(|nav| match nav.borrow_mut().as_mut() {
        Some(navigator) => f(navigator),
        None => log::warn!("Navigator not initialized"),
    });
}

/// Wire a page shown inside the content frame
#[wasm_bindgen]
pub fn init_lesson_page() -> Result<(), JsValue> {
    let config = course_config()?;
    let document = utils::document()?;
    let links = nav_ui::wire_lesson_links(&document)?;
    let popups = nav_ui::wire_popup_links(&document, &config.popup.window_features)?;
    let images = popup_ui::wire_reference_images(&document, &config.popup)?;
    popup_ui::wire_live_preview(&document, &config.popup)?;
    log::debug!("Lesson page: {} links, {} popups, {} images", links, popups, images);
    Ok(())
}

/// Draw a fresh random set of questions; repeated calls draw from the full pool
#[wasm_bindgen]
pub fn init_quiz() -> Result<(), JsValue> {
    let ready = QUIZ.with(|quiz| quiz.borrow().is_some());
    if !ready {
        let config = course_config()?;
        let document = utils::document()?;
        let Some((view, pool)) = DomQuizView::discover(&document)? else {
            log::warn!("No quiz questions on this page");
            return Ok(());
        };
        let engine = QuizEngine::new(config.quizzes, config.quiz.question_limit);
        QUIZ.with(|quiz| *quiz.borrow_mut() = Some(QuizPage::new(engine, view, pool)));
    }

    QUIZ.with(|quiz| {
        if let Some(page) = quiz.borrow().as_ref() {
            page.setup();
        }
    });
    Ok(())
}

/// Grade `quiz_id`, show the score and reset its inputs
#[wasm_bindgen(js_name = submitQuiz)]
pub fn submit_quiz(quiz_id: String) {
    QUIZ.with(|quiz| match quiz.borrow().as_ref() {
        Some(page) => {
            page.submit(&quiz_id);
        }
        None => log::warn!("Quiz not initialized, cannot grade {}", quiz_id),
    });
}
