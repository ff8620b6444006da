use log::{error, info, warn, Level};

mod components;
mod config;
mod debounce;
mod dom;
mod error;
mod form;
mod hover;
mod lightbox;
mod nav;
mod scroll;
mod viewport;

use config::SiteConfig;
use error::Result;
use form::ContactForm;
use hover::CardHover;
use lightbox::LightboxController;
use nav::NavigationController;
use scroll::ScrollReactor;
use viewport::{ViewportObserver, WatchAction};

/// Installs one page feature; a failure only disables that feature.
fn install<T>(feature: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(installed) => Some(installed),
        Err(e) => {
            warn!("{} disabled: {}", feature, e);
            None
        }
    }
}

fn print_banner(config: &SiteConfig) {
    gloo_console::log!(
        format!("%c{}", config.banner_title),
        "font-size: 20px; font-weight: bold; color: #1a3a2e;"
    );
    gloo_console::log!(
        format!("%c{}", config.banner_tagline),
        "font-size: 12px; color: #6a6a6a;"
    );
}

fn enhance_page() -> Result<()> {
    let document = dom::document()?;
    let config = SiteConfig::load(&document);

    let _scroll = install("Scroll reactor", ScrollReactor::install(&document, &config));
    let _nav = install("Smooth navigation", NavigationController::install(&document));
    let reveal = install(
        "Reveal animations",
        ViewportObserver::install(&document, &config, WatchAction::Reveal),
    );
    let lazy = install(
        "Lazy images",
        ViewportObserver::install(&document, &config, WatchAction::LazyLoad),
    );
    let lightbox = install("Lightbox", LightboxController::install(&document));
    let _form = install("Contact form", ContactForm::install(&document, &config));
    let _hover = install("Card hover", CardHover::install(&document, &config));

    info!(
        "Page enhanced: {} reveals and {} images pending, lightbox {}",
        reveal.as_ref().map_or(0, |r| r.pending()),
        lazy.as_ref().map_or(0, |l| l.pending()),
        match &lightbox {
            Some(l) if l.is_open() => "open",
            Some(_) => "ready",
            None => "unavailable",
        }
    );

    print_banner(&config);
    Ok(())
}

fn main() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    console_log::init_with_level(level).expect("error initializing log");

    info!("Starting page enhancements");
    if let Err(e) = enhance_page() {
        error!("Page enhancements unavailable: {}", e);
    }
}
