//! Element lookup helpers. Missing elements are skipped silently: the HTML
//! pages may omit regions they do not show.

#[cfg(target_family = "wasm")]
use wasm_bindgen::JsCast;

#[cfg(target_family = "wasm")]
pub fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

#[cfg(target_family = "wasm")]
pub fn by_id<T: JsCast>(document: &web_sys::Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Calls the closure with the element if it exists and has the right type.
#[cfg(target_family = "wasm")]
pub fn with_element<T: JsCast>(document: &web_sys::Document, id: &str, f: impl FnOnce(&T)) {
    if let Some(el) = by_id::<T>(document, id) {
        f(&el);
    }
}

#[cfg(target_family = "wasm")]
pub fn set_text(document: &web_sys::Document, id: &str, text: &str) {
    with_element::<web_sys::Element>(document, id, |el| el.set_text_content(Some(text)));
}

#[cfg(target_family = "wasm")]
pub fn set_style(el: &web_sys::HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        crate::diag::console_warn!("style {property}={value} rejected: {e:?}");
    }
}

#[cfg(target_family = "wasm")]
pub fn set_display(el: &web_sys::HtmlElement, visible: bool) {
    set_style(el, "display", if visible { "block" } else { "none" });
}

/// Every element matching `selector`, cast to `HtmlElement`.
#[cfg(target_family = "wasm")]
pub fn query_all(document: &web_sys::Document, selector: &str) -> Vec<web_sys::HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .collect()
}

/// `<tag class="class">text</tag>`, text set via `textContent`.
#[cfg(target_family = "wasm")]
pub fn create(
    document: &web_sys::Document,
    tag: &str,
    class: &str,
    text: Option<&str>,
) -> Option<web_sys::HtmlElement> {
    let el = document
        .create_element(tag)
        .ok()?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()?;
    el.set_class_name(class);
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Some(el)
}

#[cfg(target_family = "wasm")]
pub fn on_click(document: &web_sys::Document, id: &str, handler: impl FnMut() + 'static) {
    listen(document, id, "click", handler);
}

/// Attach `handler` for `event` on the element with `id`.
#[cfg(target_family = "wasm")]
pub fn listen(
    document: &web_sys::Document,
    id: &str,
    event: &str,
    mut handler: impl FnMut() + 'static,
) {
    use wasm_bindgen::closure::Closure;

    let Some(el) = document.get_element_by_id(id) else {
        crate::diag::console_warn!("#{id} missing; {event} handler not attached");
        return;
    };
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| handler());
    let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
