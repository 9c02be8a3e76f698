use cybercj_course::ContentFrame;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlIFrameElement, MouseEvent};

use crate::dom;
use crate::utils;

/// The `#module` iframe
pub struct DomFrame {
    frame: HtmlIFrameElement,
}

impl DomFrame {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            frame: dom::get_typed_by_id(document, "module")?,
        })
    }
}

impl ContentFrame for DomFrame {
    fn source(&self) -> Option<String> {
        self.frame.get_attribute("src")
    }

    fn set_source(&self, target: &str) {
        if let Err(e) = self.frame.set_attribute("src", target) {
            log::error!("Failed to load {}: {:?}", target, e);
        }
    }
}

/// Keep clicks inside the sitemap submenu from closing the dropdown
pub fn keep_submenu_open(document: &Document) -> Result<(), JsValue> {
    if let Some(link) = document.get_element_by_id("navbarDropdownSubMenuLink") {
        dom::add_event_listener(&link, "click", |event: MouseEvent| event.stop_propagation())?;
    }
    Ok(())
}

/// Route `.navBar-target` links in a lesson page to the parent's `navigateTo`
pub fn wire_lesson_links(document: &Document) -> Result<usize, JsValue> {
    let links = dom::query_document(document, ".navBar-target")?;
    for link in &links {
        let target = link.clone();
        dom::add_event_listener(link, "click", move |event: MouseEvent| {
            event.prevent_default();
            let Some(key) = target.get_attribute("href") else {
                return;
            };
            if let Err(e) = call_parent_navigate(&key) {
                log::error!("Parent navigation to {} failed: {:?}", key, e);
            }
        })?;
    }
    Ok(links.len())
}

/// Open `.popupLink` anchors in a sized popup window
pub fn wire_popup_links(document: &Document, features: &str) -> Result<usize, JsValue> {
    let links = dom::query_document(document, ".popupLink")?;
    for link in &links {
        let anchor: Element = link.clone();
        let features = features.to_string();
        dom::add_event_listener(link, "click", move |event: MouseEvent| {
            event.prevent_default();
            if let Some(url) = anchor.get_attribute("href") {
                utils::open_window(&url, "Popup", Some(&features));
            }
        })?;
    }
    Ok(links.len())
}

fn call_parent_navigate(key: &str) -> Result<(), JsValue> {
    let parent = utils::window()?
        .parent()?
        .ok_or_else(|| JsValue::from_str("No parent window"))?;
    let navigate: Function = Reflect::get(&parent, &JsValue::from_str("navigateTo"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Parent has no navigateTo"))?;
    navigate.call1(&parent, &JsValue::from_str(key))?;
    Ok(())
}
