//! Browser tests; run with `wasm-pack test --headless --firefox crates/cybercj-wasm`
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(html: &str) -> Document {
    let document = document();
    document.body().unwrap().set_inner_html(html);
    document
}

fn click(document: &Document, id: &str) {
    document
        .get_element_by_id(id)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

fn frame_src(document: &Document) -> Option<String> {
    document.get_element_by_id("module").unwrap().get_attribute("src")
}

#[wasm_bindgen_test]
fn navigator_buttons_and_jumps() {
    let document = mount(
        r#"<button id="back">Back</button>
           <iframe id="module" src="Scenario1/intro1.html"></iframe>
           <button id="next">Next</button>"#,
    );
    cybercj_wasm::init_navigator("challenges".to_string()).unwrap();

    click(&document, "next");
    assert_eq!(frame_src(&document).as_deref(), Some("Scenario1/eg1.html"));

    click(&document, "back");
    click(&document, "back");
    assert_eq!(frame_src(&document).as_deref(), Some("contact.html"));

    cybercj_wasm::navigate_to(JsValue::from(4));
    assert_eq!(frame_src(&document).as_deref(), Some("Scenario2/eg2.html"));

    cybercj_wasm::navigate_to(JsValue::from_str("https://example.org/"));
    assert_eq!(frame_src(&document).as_deref(), Some("https://example.org/"));
}

#[wasm_bindgen_test]
fn quiz_setup_draws_fifteen() {
    let questions: String = (1..=20)
        .map(|n| {
            format!(
                r#"<div class="question"><h4>. Question {n}</h4>
                   <input type="radio" name="q{n}" value="A"><label>A</label></div>"#
            )
        })
        .collect();
    let document = mount(&format!(
        r#"<div id="quiz1">{questions}<button id="quiz-submit">Submit</button></div>"#
    ));

    cybercj_wasm::init_quiz().unwrap();
    cybercj_wasm::init_quiz().unwrap();

    let container = document.get_element_by_id("quiz1").unwrap();
    assert_eq!(container.query_selector_all(".question").unwrap().length(), 15);
    let last = container.last_element_child().unwrap();
    assert_eq!(last.id(), "quiz-submit");

    let first = container.query_selector(".question h4").unwrap().unwrap();
    let heading = first.text_content().unwrap();
    assert!(heading.starts_with("1. Question "), "{}", heading);
}
