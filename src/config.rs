use log::{debug, warn};
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional `<script type="application/json">` block that overrides defaults.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Offset in px past which the header gets `scrolled`.
    pub header_threshold: f64,
    pub parallax_factor: f64,
    /// Added to the scroll offset when picking the active section.
    pub section_lookahead: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub scroll_debounce_ms: u32,
    pub toast_duration_ms: u32,
    pub card_lift: String,
    pub acknowledgment: String,
    pub banner_title: String,
    pub banner_tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_threshold: 50.0,
            parallax_factor: 0.3,
            section_lookahead: 100.0,
            reveal_threshold: 0.15,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            scroll_debounce_ms: 10,
            toast_duration_ms: 4000,
            card_lift: "translateY(-8px)".to_string(),
            acknowledgment: "Dziękujemy za wiadomość! Skontaktujemy się z Tobą wkrótce.".to_string(),
            banner_title: "🌲 OOWood - Wyspy Handlowe".to_string(),
            banner_tagline: "Strona zaprojektowana i zrealizowana z dbałością o szczegóły".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads overrides from the page, falling back to defaults when the block is
    /// absent or malformed.
    pub fn load(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => {
                debug!("Loaded site config overrides: {:?}", config);
                config
            }
            Err(e) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}
