use log::info;
use web_sys::{Document, MouseEvent};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::Result;

pub const CARD_SELECTOR: &str = ".why-us-card, .offer-card";

/// Transform to write when the pointer leaves a card. Revealed cards keep their lift.
pub fn leave_transform(revealed: bool) -> Option<&'static str> {
    (!revealed).then_some("")
}

pub struct CardHover;

impl CardHover {
    pub fn install(document: &Document, config: &SiteConfig) -> Result<Self> {
        let cards = dom::query_all(document, CARD_SELECTOR)?;

        for card in &cards {
            let html = dom::as_html(card)?;

            let lift = config.card_lift.clone();
            let target = html.clone();
            dom::listen(card, "mouseenter", move |_: MouseEvent| {
                let _ = target.style().set_property("transform", &lift);
            })?;

            let target = html.clone();
            dom::listen(card, "mouseleave", move |_: MouseEvent| {
                let revealed = target.class_list().contains("visible");
                if let Some(transform) = leave_transform(revealed) {
                    let _ = target.style().set_property("transform", transform);
                }
            })?;
        }

        info!("Hover lift attached to {} cards", cards.len());
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_resets_only_unrevealed_cards() {
        assert_eq!(leave_transform(false), Some(""));
        assert_eq!(leave_transform(true), None);
    }
}
