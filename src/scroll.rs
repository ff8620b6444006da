//! Scroll-driven page state: sticky header, hero parallax and the active nav link.

use std::rc::Rc;

use log::{debug, info, warn};
use web_sys::{Document, Element, HtmlElement};

use crate::config::SiteConfig;
use crate::debounce::{debounce, Edge};
use crate::dom;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

/// Geometry sampled from the document on one scroll tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub hero_bottom: Option<f64>,
    pub sections: Vec<SectionBounds>,
}

/// What one scroll tick should write back to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPlan {
    pub scrolled: bool,
    /// `None` leaves the last transform in place.
    pub parallax: Option<f64>,
    /// `None` leaves the current active link untouched.
    pub active_section: Option<String>,
}

pub fn header_is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub fn parallax_shift(offset: f64, hero_bottom: f64, factor: f64) -> Option<f64> {
    (offset < hero_bottom).then(|| offset * factor)
}

/// Sections are expected not to overlap; if they do, the last one in document
/// order wins.
pub fn matching_section(position: f64, sections: &[SectionBounds]) -> Option<&SectionBounds> {
    sections.iter().rev().find(|s| s.contains(position))
}

pub fn plan(offset: f64, layout: &PageLayout, config: &SiteConfig) -> ScrollPlan {
    ScrollPlan {
        scrolled: header_is_scrolled(offset, config.header_threshold),
        parallax: layout
            .hero_bottom
            .and_then(|bottom| parallax_shift(offset, bottom, config.parallax_factor)),
        active_section: matching_section(offset + config.section_lookahead, &layout.sections)
            .map(|s| s.id.clone()),
    }
}

/// Index of the first link pointing at `#id`.
pub fn active_link(hrefs: &[Option<String>], id: &str) -> Option<usize> {
    let target = format!("#{}", id);
    hrefs.iter().position(|href| href.as_deref() == Some(target.as_str()))
}

/// Active flags for every nav link after one tick. A matched section clears
/// all links and sets at most one; no match leaves `current` as it was.
pub fn active_flags(current: &[bool], hrefs: &[Option<String>], section: Option<&str>) -> Vec<bool> {
    let Some(id) = section else {
        return current.to_vec();
    };
    let chosen = active_link(hrefs, id);
    (0..hrefs.len()).map(|i| Some(i) == chosen).collect()
}

struct Hero {
    section: HtmlElement,
    image: HtmlElement,
}

pub struct ScrollReactor {
    config: SiteConfig,
    header: Option<Element>,
    hero: Option<Hero>,
    sections: Vec<HtmlElement>,
    nav_links: Vec<Element>,
}

impl ScrollReactor {
    pub fn install(document: &Document, config: &SiteConfig) -> Result<Rc<Self>> {
        let header = dom::by_id(document, "header")
            .map_err(|e| warn!("Sticky header disabled: {}", e))
            .ok();

        let hero = match (dom::query(document, ".hero"), dom::query(document, ".hero-image")) {
            (Some(section), Some(image)) => Some(Hero {
                section: dom::as_html(&section)?,
                image: dom::as_html(&image)?,
            }),
            _ => {
                debug!("No hero section or image, parallax skipped");
                None
            }
        };

        let sections = dom::query_all(document, "section[id]")?
            .iter()
            .filter_map(|s| dom::as_html(s).ok())
            .collect::<Vec<_>>();
        let nav_links = dom::query_all(document, ".nav-link")?;

        let reactor = Rc::new(Self {
            config: config.clone(),
            header,
            hero,
            sections,
            nav_links,
        });

        let on_scroll = {
            let reactor = Rc::clone(&reactor);
            debounce(
                move |()| {
                    if let Err(e) = reactor.tick() {
                        warn!("Scroll update failed: {}", e);
                    }
                },
                config.scroll_debounce_ms,
                Edge::Both,
            )
        };
        dom::listen(&dom::window()?.into(), "scroll", move |_: web_sys::Event| on_scroll.call(()))?;

        info!(
            "Scroll reactor tracking {} sections and {} nav links",
            reactor.sections.len(),
            reactor.nav_links.len()
        );
        // Match whatever scroll position the browser restored.
        reactor.tick()?;
        Ok(reactor)
    }

    fn layout(&self) -> PageLayout {
        PageLayout {
            hero_bottom: self
                .hero
                .as_ref()
                .map(|h| f64::from(h.section.offset_top() + h.section.offset_height())),
            sections: self
                .sections
                .iter()
                .map(|s| SectionBounds {
                    id: s.id(),
                    top: f64::from(s.offset_top()),
                    height: f64::from(s.offset_height()),
                })
                .collect(),
        }
    }

    pub fn tick(&self) -> Result<()> {
        let offset = dom::scroll_y()?;
        self.apply(&plan(offset, &self.layout(), &self.config))
    }

    fn apply(&self, plan: &ScrollPlan) -> Result<()> {
        if let Some(header) = &self.header {
            dom::set_class(header, "scrolled", plan.scrolled)?;
        }

        if let (Some(hero), Some(shift)) = (&self.hero, plan.parallax) {
            hero.image
                .style()
                .set_property("transform", &format!("translateY({}px)", shift))?;
        }

        if plan.active_section.is_some() {
            let current = self
                .nav_links
                .iter()
                .map(|l| l.class_list().contains("active"))
                .collect::<Vec<_>>();
            let hrefs = self
                .nav_links
                .iter()
                .map(|l| l.get_attribute("href"))
                .collect::<Vec<_>>();
            let flags = active_flags(&current, &hrefs, plan.active_section.as_deref());
            for (link, active) in self.nav_links.iter().zip(flags) {
                dom::set_class(link, "active", active)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds { id: "home".into(), top: 0.0, height: 600.0 },
            SectionBounds { id: "about".into(), top: 600.0, height: 400.0 },
            SectionBounds { id: "contact".into(), top: 1000.0, height: 500.0 },
        ]
    }

    #[test]
    fn test_header_threshold_has_no_hysteresis() {
        assert!(!header_is_scrolled(0.0, 50.0));
        assert!(header_is_scrolled(60.0, 50.0));
        assert!(!header_is_scrolled(10.0, 50.0));
        assert!(!header_is_scrolled(50.0, 50.0));
    }

    #[test]
    fn test_parallax_only_above_hero_bottom() {
        assert_eq!(parallax_shift(100.0, 700.0, 0.3), Some(100.0 * 0.3));
        assert_eq!(parallax_shift(0.0, 700.0, 0.3), Some(0.0));
        assert_eq!(parallax_shift(700.0, 700.0, 0.3), None);
        assert_eq!(parallax_shift(900.0, 700.0, 0.3), None);
    }

    #[test]
    fn test_section_boundaries_are_half_open() {
        let sections = sections();
        assert_eq!(matching_section(599.0, &sections).unwrap().id, "home");
        assert_eq!(matching_section(600.0, &sections).unwrap().id, "about");
        assert_eq!(matching_section(1499.0, &sections).unwrap().id, "contact");
        assert!(matching_section(1500.0, &sections).is_none());
    }

    #[test]
    fn test_overlapping_sections_pick_last() {
        let sections = vec![
            SectionBounds { id: "a".into(), top: 0.0, height: 500.0 },
            SectionBounds { id: "b".into(), top: 400.0, height: 500.0 },
        ];
        assert_eq!(matching_section(450.0, &sections).unwrap().id, "b");
    }

    #[test]
    fn test_plan_applies_lookahead() {
        let config = SiteConfig::default();
        let layout = PageLayout {
            hero_bottom: Some(600.0),
            sections: sections(),
        };

        // 520 + 100 lands in "about" while the hero is still on screen.
        let plan = plan(520.0, &layout, &config);
        assert!(plan.scrolled);
        assert_eq!(plan.active_section.as_deref(), Some("about"));
        assert!((plan.parallax.unwrap() - 156.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_without_hero_or_match() {
        let config = SiteConfig::default();
        let layout = PageLayout {
            hero_bottom: None,
            sections: sections(),
        };

        let plan = plan(5000.0, &layout, &config);
        assert_eq!(plan.parallax, None);
        assert_eq!(plan.active_section, None);
        assert!(plan.scrolled);
    }

    fn hrefs(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|h| h.map(str::to_string)).collect()
    }

    #[test]
    fn test_duplicate_hrefs_activate_only_first_link() {
        let links = hrefs(&[Some("#home"), Some("#offer"), None, Some("#offer")]);

        assert_eq!(active_link(&links, "offer"), Some(1));
        let flags = active_flags(&[false, false, false, true], &links, Some("offer"));
        assert_eq!(flags, vec![false, true, false, false]);
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn test_section_without_link_clears_all() {
        let links = hrefs(&[Some("#home"), Some("#offer")]);

        assert_eq!(active_link(&links, "gallery"), None);
        assert_eq!(active_flags(&[true, false], &links, Some("gallery")), vec![false, false]);
    }

    #[test]
    fn test_no_matching_section_keeps_previous_link() {
        let links = hrefs(&[Some("#home"), Some("#offer")]);
        assert_eq!(active_flags(&[false, true], &links, None), vec![false, true]);
    }

    #[test]
    fn test_plan_at_top() {
        let plan = plan(0.0, &PageLayout::default(), &SiteConfig::default());
        assert_eq!(
            plan,
            ScrollPlan {
                scrolled: false,
                parallax: None,
                active_section: None,
            }
        );
    }
}
