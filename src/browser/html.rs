//! Static HTML browser backend
//!
//! Fetches pages over plain HTTP and reads the navigation menu from the
//! server-rendered markup. No JavaScript runs, so menus built client-side are
//! invisible to this backend; sites like that need an engine-backed
//! [`Browser`] implementation supplied by the embedding application.

use super::{Browser, BrowserSession, NavigationEntry};
use crate::config::MenuSelectors;
use crate::url::resolve_link;
use crate::{BrowserError, BrowserResult};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Browser that reads navigation menus from static HTML
#[derive(Debug, Clone)]
pub struct StaticHtmlBrowser {
    menu: MenuSelectors,
    user_agent: String,
}

impl StaticHtmlBrowser {
    /// Creates a browser reading menus described by `menu`
    pub fn new(menu: MenuSelectors, user_agent: impl Into<String>) -> Self {
        Self {
            menu,
            user_agent: user_agent.into(),
        }
    }
}

impl Browser for StaticHtmlBrowser {
    fn open(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        let client = Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        Ok(Box::new(StaticHtmlSession {
            client: Some(client),
            menu: self.menu.clone(),
            page: None,
        }))
    }
}

/// A fetched page: final URL after redirects plus its body
struct LoadedPage {
    url: Url,
    body: String,
}

struct StaticHtmlSession {
    client: Option<Client>,
    menu: MenuSelectors,
    page: Option<LoadedPage>,
}

impl BrowserSession for StaticHtmlSession {
    fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let navigation_error = |message: String| BrowserError::Navigation {
            url: url.to_string(),
            message,
        };

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| navigation_error("session is closed".to_string()))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| navigation_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation_error(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let body = response.text().map_err(|e| navigation_error(e.to_string()))?;

        tracing::debug!("Loaded {} ({} bytes)", final_url, body.len());
        self.page = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn read_navigation_structure(&mut self) -> BrowserResult<Vec<NavigationEntry>> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| BrowserError::Render("no page loaded".to_string()))?;
        parse_navigation(&page.body, &page.url, &self.menu)
    }

    fn close(&mut self) -> BrowserResult<()> {
        self.page = None;
        self.client = None;
        Ok(())
    }
}

/// Extracts navigation entries from an HTML document
///
/// Every element matching `section_selector` is a menu section. The section's
/// `tag_attribute` holds its tag hints (comma or whitespace separated) and
/// `selectors_key_attribute` its selectors key. Each `link_selector` match
/// inside a section becomes one entry, with its href resolved against
/// `base_url`.
///
/// Sections may nest. A link belongs to its innermost section only; it
/// inherits the tags of every enclosing section, outermost first, and the
/// selectors key of the nearest section that declares one.
///
/// # Example
///
/// ```
/// use seedline::browser::parse_navigation;
/// use seedline::config::MenuSelectors;
/// use url::Url;
///
/// let html = r#"<nav><ul data-tag="guides"><li><a href="/intro">Intro</a></li></ul></nav>"#;
/// let base = Url::parse("https://docs.example.com/").unwrap();
/// let entries = parse_navigation(html, &base, &MenuSelectors::default()).unwrap();
/// assert_eq!(entries[0].url, "https://docs.example.com/intro");
/// assert_eq!(entries[0].tags, vec!["guides"]);
/// ```
pub fn parse_navigation(
    html: &str,
    base_url: &Url,
    menu: &MenuSelectors,
) -> BrowserResult<Vec<NavigationEntry>> {
    let section_selector = parse_selector(&menu.section_selector)?;
    let link_selector = parse_selector(&menu.link_selector)?;
    let document = Html::parse_document(html);

    let mut entries = Vec::new();
    for link in document.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        // innermost first; the link itself counts when it is a section
        let sections: Vec<ElementRef> = std::iter::once(link)
            .chain(link.ancestors().filter_map(ElementRef::wrap))
            .filter(|element| section_selector.matches(element))
            .collect();
        if sections.is_empty() {
            continue;
        }

        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };

        let mut tags: Vec<String> = Vec::new();
        for section in sections.iter().rev() {
            let section_tags = section.value().attr(&menu.tag_attribute).map(split_tags);
            for tag in section_tags.unwrap_or_default() {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        let selectors_key = sections.iter().find_map(|section| {
            section
                .value()
                .attr(&menu.selectors_key_attribute)
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
        });

        entries.push(NavigationEntry {
            url,
            tags,
            selectors_key,
        });
    }

    Ok(entries)
}

fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| BrowserError::Render(format!("invalid selector '{}': {:?}", selector, e)))
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
