//! Gallery modal: a two-state machine plus the DOM view it drives.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent};

use crate::dom;
use crate::error::Result;

pub const CANCEL_KEY: &str = "Escape";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightboxContent {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightboxEvent {
    ItemClicked(LightboxContent),
    CloseClicked,
    BackdropClicked,
    KeyPressed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightboxEffect {
    Show(LightboxContent),
    Hide,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LightboxState {
    #[default]
    Closed,
    Open(LightboxContent),
}

impl LightboxState {
    pub fn is_open(&self) -> bool {
        matches!(self, LightboxState::Open(_))
    }

    /// Page scroll is locked exactly while the modal is open.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn handle(&mut self, event: LightboxEvent) -> Option<LightboxEffect> {
        match event {
            // Opening while open replaces the content in place.
            LightboxEvent::ItemClicked(content) => {
                *self = LightboxState::Open(content.clone());
                Some(LightboxEffect::Show(content))
            }
            LightboxEvent::KeyPressed(key) if key != CANCEL_KEY => None,
            LightboxEvent::CloseClicked | LightboxEvent::BackdropClicked | LightboxEvent::KeyPressed(_) => {
                if !self.is_open() {
                    return None;
                }
                *self = LightboxState::Closed;
                Some(LightboxEffect::Hide)
            }
        }
    }
}

/// Inline `overflow` for the page body.
pub fn body_overflow(scroll_locked: bool) -> &'static str {
    if scroll_locked {
        "hidden"
    } else {
        ""
    }
}

struct LightboxView {
    modal: Element,
    image: HtmlImageElement,
    caption: Element,
    body: HtmlElement,
}

impl LightboxView {
    fn render(&self, effect: &LightboxEffect, scroll_locked: bool) -> Result<()> {
        match effect {
            LightboxEffect::Show(content) => {
                dom::set_class(&self.modal, "show", true)?;
                self.image.set_src(&content.src);
                self.image.set_alt(&content.alt);
                self.caption.set_text_content(Some(&content.caption));
            }
            LightboxEffect::Hide => dom::set_class(&self.modal, "show", false)?,
        }
        self.body
            .style()
            .set_property("overflow", body_overflow(scroll_locked))?;
        Ok(())
    }
}

pub struct LightboxController {
    state: RefCell<LightboxState>,
    view: LightboxView,
}

impl LightboxController {
    pub fn install(document: &Document) -> Result<Rc<Self>> {
        let view = LightboxView {
            modal: dom::by_id(document, "modal")?,
            image: dom::by_id_as::<HtmlImageElement>(document, "modalImage", "HTMLImageElement")?,
            caption: dom::by_id(document, "modalCaption")?,
            body: dom::body()?,
        };
        let controller = Rc::new(Self {
            state: RefCell::new(LightboxState::Closed),
            view,
        });

        let items = dom::query_all(document, ".gallery-item")?;
        for item in &items {
            let controller = Rc::clone(&controller);
            let source = item.clone();
            dom::listen(item, "click", move |_: MouseEvent| {
                controller.dispatch(LightboxEvent::ItemClicked(gallery_content(&source)));
            })?;
        }

        if let Some(close) = dom::query(document, ".modal-close") {
            let controller = Rc::clone(&controller);
            dom::listen(&close, "click", move |_: MouseEvent| {
                controller.dispatch(LightboxEvent::CloseClicked);
            })?;
        }

        {
            let controller = Rc::clone(&controller);
            let modal = controller.view.modal.clone();
            let backdrop = modal.clone();
            dom::listen(&modal, "click", move |e: MouseEvent| {
                let on_backdrop = e
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map_or(false, |t| t == backdrop);
                if on_backdrop {
                    controller.dispatch(LightboxEvent::BackdropClicked);
                }
            })?;
        }

        {
            let controller = Rc::clone(&controller);
            dom::listen(document, "keydown", move |e: KeyboardEvent| {
                controller.dispatch(LightboxEvent::KeyPressed(e.key()));
            })?;
        }

        info!("Lightbox attached to {} gallery items", items.len());
        Ok(controller)
    }

    pub fn dispatch(&self, event: LightboxEvent) {
        let (effect, scroll_locked) = {
            let mut state = self.state.borrow_mut();
            (state.handle(event), state.scroll_locked())
        };
        if let Some(effect) = effect {
            debug!("Lightbox -> {:?}", effect);
            if let Err(e) = self.view.render(&effect, scroll_locked) {
                warn!("Lightbox render failed: {}", e);
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }
}

fn gallery_content(item: &Element) -> LightboxContent {
    let image = item
        .query_selector("img")
        .ok()
        .flatten()
        .and_then(|img| img.dyn_into::<HtmlImageElement>().ok());
    LightboxContent {
        src: image.as_ref().map(|i| i.src()).unwrap_or_default(),
        alt: image.as_ref().map(|i| i.alt()).unwrap_or_default(),
        caption: item.get_attribute("data-title").unwrap_or_default(),
    }
}
