use cybercj_course::popup::{self, PreviewPanel};
use cybercj_course::PopupConfig;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::dom;
use crate::utils;

/// `#IframePreview` and `#staticPreview`, either of which may be absent
struct DomPreview {
    live: Option<Element>,
    still: Option<Element>,
}

impl PreviewPanel for DomPreview {
    fn set_live_visible(&self, visible: bool) {
        if let Some(live) = &self.live {
            set_visible(live, visible);
        }
    }

    fn set_static_visible(&self, visible: bool) {
        if let Some(still) = &self.still {
            set_visible(still, visible);
        }
    }
}

fn set_visible(element: &Element, visible: bool) {
    if visible {
        dom::show_element(element);
    } else {
        dom::hide_element(element);
    }
}

/// Show the `data-img` of `.hover-trigger` elements in the `.hover-image` box
pub fn wire_reference_images(document: &Document, config: &PopupConfig) -> Result<usize, JsValue> {
    let Ok(Some(popup_box)) = document.query_selector(".hover-image") else {
        return Ok(0);
    };
    let config = Rc::new(config.clone());
    let triggers = dom::query_document(document, ".hover-trigger")?;

    for trigger in &triggers {
        let anchor = trigger.clone();
        let target = popup_box.clone();
        let config = config.clone();
        dom::add_event_listener(trigger, "mouseenter", move |_: web_sys::MouseEvent| {
            let src = anchor.get_attribute("data-img").unwrap_or_default();
            let image = popup::reference_image(&config, &src, utils::page_offset(&anchor));
            target.set_inner_html(&image.html);
            dom::set_px(&target, "top", image.position.top);
            dom::set_px(&target, "left", image.position.left);
            dom::show_element(&target);
        })?;

        let target = popup_box.clone();
        dom::add_event_listener(trigger, "mouseleave", move |_: web_sys::MouseEvent| {
            dom::hide_element(&target);
        })?;
    }
    Ok(triggers.len())
}

/// Live threat map preview: swap previews on hover, open the live map on click
///
/// Containers wired by an earlier call are skipped; returns how many were newly wired.
pub fn wire_live_preview(document: &Document, config: &PopupConfig) -> Result<usize, JsValue> {
    let panel = Rc::new(DomPreview {
        live: document.get_element_by_id("IframePreview"),
        still: document.get_element_by_id("staticPreview"),
    });
    let containers = dom::claim_unwired(dom::query_document(document, ".iframe-container")?)?;

    for container in &containers {
        let hover = panel.clone();
        dom::add_event_listener(container, "mouseenter", move |_: web_sys::MouseEvent| {
            popup::preview_hover(hover.as_ref(), true)
        })?;

        let hover = panel.clone();
        dom::add_event_listener(container, "mouseleave", move |_: web_sys::MouseEvent| {
            popup::preview_hover(hover.as_ref(), false)
        })?;

        let url = config.live_preview_url.clone();
        dom::add_click_listener(container, move || utils::open_window(&url, "_blank", None))?;
    }
    Ok(containers.len())
}
