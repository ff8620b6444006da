use log::{debug, info, warn};
use web_sys::{Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions};

use crate::dom;
use crate::error::Result;

/// Scroll position that puts a section's top edge just below the fixed header.
pub fn scroll_target(section_top: f64, header_height: f64) -> f64 {
    section_top - header_height
}

/// In-page links resolve as selectors; anything else has no scroll target.
pub fn anchor_selector(href: &str) -> Option<&str> {
    (href.len() > 1 && href.starts_with('#')).then_some(href)
}

pub struct NavigationController;

impl NavigationController {
    pub fn install(document: &Document) -> Result<Self> {
        let header = dom::by_id(document, "header").ok().and_then(|h| dom::as_html(&h).ok());
        let links = dom::query_all(document, ".nav-link")?;

        for link in &links {
            let document = document.clone();
            let header = header.clone();
            let href = link.get_attribute("href").unwrap_or_default();
            dom::listen(link, "click", move |e: MouseEvent| {
                e.prevent_default();
                let Some(target) = anchor_selector(&href).and_then(|sel| dom::query(&document, sel)) else {
                    debug!("No section for link `{}`", href);
                    return;
                };
                if let Err(e) = scroll_to(&target, header.as_ref()) {
                    warn!("Smooth scroll to `{}` failed: {}", href, e);
                }
            })?;
        }

        info!("Smooth scrolling enabled for {} nav links", links.len());
        Ok(Self)
    }
}

fn scroll_to(target: &Element, header: Option<&HtmlElement>) -> Result<()> {
    let section_top = f64::from(dom::as_html(target)?.offset_top());
    let header_height = header.map(|h| f64::from(h.offset_height())).unwrap_or(0.0);

    let options = ScrollToOptions::new();
    options.set_top(scroll_target(section_top, header_height));
    options.set_behavior(ScrollBehavior::Smooth);
    dom::window()?.scroll_to_with_scroll_to_options(&options);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_target_compensates_for_header() {
        assert_eq!(scroll_target(800.0, 80.0), 720.0);
        assert_eq!(scroll_target(0.0, 0.0), 0.0);
        // Sections under the header yield a negative offset, which the browser clamps.
        assert_eq!(scroll_target(40.0, 80.0), -40.0);
    }

    #[test]
    fn test_anchor_selector() {
        assert_eq!(anchor_selector("#about"), Some("#about"));
        assert_eq!(anchor_selector("#"), None);
        assert_eq!(anchor_selector(""), None);
        assert_eq!(anchor_selector("/pricing"), None);
    }
}
