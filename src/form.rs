//! Contact form: collects the fields, resets the form and hands the message to
//! a toast that tracks delivery.

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use log::{debug, info, warn};
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use crate::components::toast::{Toast, ToastProps};
use crate::config::SiteConfig;
use crate::dom;
use crate::error::{Result, SiteError};

pub const TOAST_ROOT_ID: &str = "toast-root";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn read(document: &Document) -> Result<Self> {
        Ok(Self {
            name: field_value(document, "name")?,
            email: field_value(document, "email")?,
            message: field_value(document, "message")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Pending,
    Sent,
    Failed(String),
}

impl From<Result<()>> for Submission {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Submission::Sent,
            Err(e) => Submission::Failed(e.to_string()),
        }
    }
}

/// Hands the message off for delivery.
///
/// There is no transport yet, so delivery settles on the next tick. The
/// submit handler has already logged the message.
pub async fn deliver(_message: ContactMessage) -> Result<()> {
    TimeoutFuture::new(0).await;
    debug!("No contact transport configured, delivery settled locally");
    Ok(())
}

fn field_value(document: &Document, id: &str) -> Result<String> {
    let field = dom::by_id(document, id)?;
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        return Ok(input.value());
    }
    if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        return Ok(area.value());
    }
    Err(SiteError::WrongElementType {
        selector: format!("#{}", id),
        expected: "form field",
    })
}

fn toast_root(document: &Document) -> Result<Element> {
    if let Some(root) = document.get_element_by_id(TOAST_ROOT_ID) {
        return Ok(root);
    }
    let root = document.create_element("div")?;
    root.set_id(TOAST_ROOT_ID);
    dom::body()?.append_child(&root)?;
    Ok(root)
}

pub fn show_toast(document: &Document, config: &SiteConfig, message: ContactMessage) -> Result<()> {
    let slot = document.create_element("div")?;
    toast_root(document)?.append_child(&slot)?;

    let handle = yew::Renderer::<Toast>::with_root_and_props(
        slot.clone(),
        ToastProps {
            message,
            acknowledgment: config.acknowledgment.clone(),
        },
    )
    .render();

    Timeout::new(config.toast_duration_ms, move || {
        handle.destroy();
        slot.remove();
    })
    .forget();
    Ok(())
}

pub struct ContactForm;

impl ContactForm {
    pub fn install(document: &Document, config: &SiteConfig) -> Result<Self> {
        let form = dom::by_id_as::<HtmlFormElement>(document, "contactForm", "HTMLFormElement")?;

        let document = document.clone();
        let config = config.clone();
        let target = form.clone();
        dom::listen(&target, "submit", move |e: Event| {
            e.prevent_default();
            let message = match ContactMessage::read(&document) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Contact form incomplete: {}", e);
                    return;
                }
            };

            match serde_json::to_string(&message) {
                Ok(json) => info!("Contact form submitted: {}", json),
                Err(e) => warn!("Could not serialize contact message: {}", e),
            }
            form.reset();

            if let Err(e) = show_toast(&document, &config, message) {
                warn!("Could not show acknowledgment: {}", e);
            }
        })?;

        info!("Contact form handler attached");
        Ok(Self)
    }
}
