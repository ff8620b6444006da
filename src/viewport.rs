//! One-shot intersection watching for reveal animations and lazy images.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::Result;

/// Elements still waiting for their single action.
///
/// `take` removes by swap-remove, so once an entry has fired it can never fire
/// again no matter how many more intersection reports arrive for it.
#[derive(Debug)]
pub struct WatchList<T> {
    entries: Vec<T>,
}

impl<T> Default for WatchList<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: PartialEq> WatchList<T> {
    /// Returns false if the item is already being watched.
    pub fn watch(&mut self, item: T) -> bool {
        if self.entries.contains(&item) {
            return false;
        }
        self.entries.push(item);
        true
    }

    pub fn take(&mut self, item: &T) -> Option<T> {
        let index = self.entries.iter().position(|e| e == item)?;
        Some(self.entries.swap_remove(index))
    }

    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs `action` on every item, collecting the ones that failed.
pub fn apply_all<T, E>(items: Vec<T>, mut action: impl FnMut(&T) -> std::result::Result<(), E>) -> Vec<(T, E)> {
    items
        .into_iter()
        .filter_map(|item| match action(&item) {
            Ok(()) => None,
            Err(e) => Some((item, e)),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    Reveal,
    LazyLoad,
}

impl WatchAction {
    pub fn selector(self) -> &'static str {
        match self {
            WatchAction::Reveal => "[data-animate]",
            WatchAction::LazyLoad => "img[data-src]",
        }
    }

    fn options(self, config: &SiteConfig) -> IntersectionObserverInit {
        let options = IntersectionObserverInit::new();
        if self == WatchAction::Reveal {
            options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
            options.set_root_margin(&config.reveal_root_margin);
        }
        options
    }

    fn apply(self, element: &Element) -> Result<()> {
        match self {
            WatchAction::Reveal => dom::set_class(element, "visible", true),
            WatchAction::LazyLoad => {
                if let Some(src) = element.get_attribute("data-src") {
                    element.set_attribute("src", &src)?;
                }
                dom::set_class(element, "loaded", true)
            }
        }
    }
}

/// Whether the host exposes `IntersectionObserver`.
pub fn intersection_supported() -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
        .unwrap_or(false)
}

pub struct ViewportObserver {
    action: WatchAction,
    pending: Rc<RefCell<WatchList<Element>>>,
    observer: Option<IntersectionObserver>,
}

impl ViewportObserver {
    pub fn install(document: &Document, config: &SiteConfig, action: WatchAction) -> Result<Self> {
        let pending = Rc::new(RefCell::new(WatchList::default()));
        for element in dom::query_all(document, action.selector())? {
            pending.borrow_mut().watch(element);
        }
        let count = pending.borrow().len();
        if pending.borrow().is_empty() {
            debug!("No elements match {}", action.selector());
        }

        if !intersection_supported() {
            let mut this = Self {
                action,
                pending,
                observer: None,
            };
            warn!("IntersectionObserver unavailable, applying {:?} to {} elements now", action, count);
            this.flush();
            return Ok(this);
        }

        let callback = {
            let pending = Rc::clone(&pending);
            Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    let Some(element) = pending.borrow_mut().take(&target) else { continue };
                    if let Err(e) = action.apply(&element) {
                        warn!("{:?} failed on <{}>: {}", action, element.tag_name(), e);
                    }
                    observer.unobserve(&element);
                    debug!("{:?} fired, {} still watched", action, pending.borrow().len());
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &action.options(config),
        )?;
        callback.forget();

        for element in pending.borrow().entries.iter() {
            observer.observe(element);
        }
        info!("Watching {} elements for {:?}", count, action);

        Ok(Self {
            action,
            pending,
            observer: Some(observer),
        })
    }

    /// Applies the action to everything still pending and stops observing.
    /// A failing element is logged and does not stop the rest.
    pub fn flush(&mut self) -> usize {
        let elements = self.pending.borrow_mut().drain();
        if let Some(observer) = &self.observer {
            for element in &elements {
                observer.unobserve(element);
            }
        }
        let action = self.action;
        let failures = apply_all(elements, |element| action.apply(element));
        for (element, e) in &failures {
            warn!("{:?} failed on <{}>: {}", action, element.tag_name(), e);
        }
        failures.len()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_entry_fires_once() {
        let mut list = WatchList::default();
        for id in ["hero", "about", "offer"] {
            assert!(list.watch(id));
        }

        assert_eq!(list.take(&"about"), Some("about"));
        assert_eq!(list.take(&"about"), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_swap_remove_keeps_remaining_entries_reachable() {
        let mut list = WatchList::default();
        for i in 0..5 {
            list.watch(i);
        }

        assert_eq!(list.take(&0), Some(0));
        // 4 was swapped into slot 0; every other entry must still be takeable.
        for i in [4, 1, 3, 2] {
            assert_eq!(list.take(&i), Some(i));
        }
        assert!(list.is_empty());
    }

    #[test]
    fn test_duplicate_watch_is_ignored() {
        let mut list = WatchList::default();
        assert!(list.watch("a.jpg"));
        assert!(!list.watch("a.jpg"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_drain_empties_list() {
        let mut list = WatchList::default();
        list.watch(1);
        list.watch(2);

        let mut drained = list.drain();
        drained.sort();
        assert_eq!(drained, vec![1, 2]);
        assert!(list.is_empty());
        assert_eq!(list.take(&1), None);
    }

    #[test]
    fn test_apply_all_continues_past_failures() {
        let mut applied = Vec::new();
        let failures = apply_all(vec![1, 2, 3, 4], |n| {
            applied.push(*n);
            if n % 2 == 0 {
                Err(format!("broken {}", n))
            } else {
                Ok(())
            }
        });

        assert_eq!(applied, vec![1, 2, 3, 4]);
        assert_eq!(failures, vec![(2, "broken 2".to_string()), (4, "broken 4".to_string())]);
    }

    #[test]
    fn test_selectors() {
        assert_eq!(WatchAction::Reveal.selector(), "[data-animate]");
        assert_eq!(WatchAction::LazyLoad.selector(), "img[data-src]");
    }
}
