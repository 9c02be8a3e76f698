use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

/// Get element by ID
pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

/// Get element by ID, cast to a concrete element type
pub fn get_typed_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    get_element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element has unexpected type: {}", id)))
}

/// All elements under `root` matching `selector`, in document order
pub fn query_all(root: &Element, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Same as [`query_all`] over the whole document
pub fn query_document(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Every checkable input under `root`
pub fn choice_inputs(root: &Element) -> Result<Vec<HtmlInputElement>, JsValue> {
    Ok(query_all(root, r#"input[type="radio"], input[type="checkbox"]"#)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

/// Keep the elements not yet marked with `data-wired`, marking them
///
/// Lets several entry points on one page wire the same selector without
/// stacking duplicate listeners.
pub fn claim_unwired(elements: Vec<Element>) -> Result<Vec<Element>, JsValue> {
    let mut claimed = Vec::with_capacity(elements.len());
    for element in elements {
        if element.has_attribute("data-wired") {
            continue;
        }
        element.set_attribute("data-wired", "")?;
        claimed.push(element);
    }
    Ok(claimed)
}

/// Create element with class
pub fn create_element_with_class(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Add an event listener that receives the event
pub fn add_event_listener<E, F>(element: &Element, event: &str, callback: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(E)>);
    element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Keep the closure alive
    Ok(())
}

/// Add click listener to element
pub fn add_click_listener<F>(element: &Element, mut callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    add_event_listener(element, "click", move |_: web_sys::Event| callback())
}

/// Show element
pub fn show_element(element: &Element) {
    set_display(element, "block");
}

/// Hide element
pub fn hide_element(element: &Element) {
    set_display(element, "none");
}

/// Drop any inline `display` so the stylesheet decides
pub fn reset_display(element: &Element) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().remove_property("display");
    }
}

fn set_display(element: &Element, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}

/// Set an inline style property in pixels
pub fn set_px(element: &Element, property: &str, value: f64) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, &format!("{}px", value));
    }
}

/// Clear element content
pub fn clear_element(element: &Element) {
    element.set_inner_html("");
}

/// Scroll element to bottom
pub fn scroll_to_bottom(element: &Element) {
    element.set_scroll_top(element.scroll_height());
}
