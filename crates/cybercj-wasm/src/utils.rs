use cybercj_course::popup::Offset;
use wasm_bindgen::JsValue;
use web_sys::{Element, Window};

/// Get the window object
pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
pub fn document() -> Result<web_sys::Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}

/// Origin of the current page, e.g. `https://host:port`
pub fn page_origin() -> Result<String, JsValue> {
    window()?
        .location()
        .origin()
        .map_err(|_| JsValue::from_str("Failed to get page origin"))
}

/// Blocking message box
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::error!("alert failed: {:?}", e);
        }
    }
}

/// Open `url` in a new browsing context
pub fn open_window(url: &str, target: &str, features: Option<&str>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let opened = match features {
        Some(features) => window.open_with_url_and_target_and_features(url, target, features),
        None => window.open_with_url_and_target(url, target),
    };
    if let Err(e) = opened {
        log::error!("Failed to open {}: {:?}", url, e);
    }
}

/// Position of `element` relative to the document
pub fn page_offset(element: &Element) -> Offset {
    let rect = element.get_bounding_client_rect();
    let (scroll_x, scroll_y) = web_sys::window()
        .map(|w| (w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0));
    Offset {
        top: rect.top() + scroll_y,
        left: rect.left() + scroll_x,
    }
}

/// Lesson key passed from script: a page index or a URL
pub fn nav_key(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().map(format_index))
}

/// Render a JS number the way the page map keys are written
pub fn format_index(value: f64) -> String {
    if value.fract() == 0.0 && value >= 0.0 {
        format!("{}", value as u64)
    } else {
        value.to_string()
    }
}
