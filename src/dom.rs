//! Thin helpers over `web_sys` lookups so every component can bail out with `?`
//! when the markup it needs is missing.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use crate::error::{Result, SiteError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(SiteError::MissingGlobal("window"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or(SiteError::MissingGlobal("document"))
}

pub fn body() -> Result<HtmlElement> {
    document()?.body().ok_or(SiteError::MissingGlobal("document.body"))
}

/// Current vertical scroll offset of the window.
pub fn scroll_y() -> Result<f64> {
    Ok(window()?.scroll_y()?)
}

pub fn by_id(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SiteError::MissingElement(format!("#{}", id)))
}

pub fn by_id_as<T: JsCast>(document: &Document, id: &str, expected: &'static str) -> Result<T> {
    by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| SiteError::WrongElementType {
            selector: format!("#{}", id),
            expected,
        })
}

/// First match for `selector`. An invalid selector counts as no match.
pub fn query(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn as_html(element: &Element) -> Result<HtmlElement> {
    element
        .clone()
        .dyn_into::<HtmlElement>()
        .map_err(|_| SiteError::WrongElementType {
            selector: element.tag_name().to_lowercase(),
            expected: "HTMLElement",
        })
}

/// Attaches `handler` for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn set_class(element: &Element, class: &str, on: bool) -> Result<()> {
    let classes = element.class_list();
    if on {
        classes.add_1(class)?;
    } else {
        classes.remove_1(class)?;
    }
    Ok(())
}
