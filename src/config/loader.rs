//! Configuration loader
//!
//! Runs validation, seed normalization and automatic-tagging expansion in
//! that order and exposes the result as a [`NormalizedConfig`]. Loading is
//! all-or-nothing: any failure aborts construction.

use crate::browser::{Browser, ScopedSession, StaticHtmlBrowser};
use crate::config::parser::read_raw_config;
use crate::config::seeds::{normalize_all, NormalizedSeed};
use crate::config::types::{
    ExpansionPolicy, NormalizedConfig, RawConfig, SeedRecord, DEFAULT_SELECTORS_KEY,
};
use crate::config::validation::validate;
use crate::tagging::AutomaticTagExpander;
use crate::url::{domain_of, matches_wildcard};
use crate::{ConfigResult, ConfigShapeError, ExpansionError};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Builds and owns the normalized configuration for one crawl run
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: NormalizedConfig,
}

impl ConfigLoader {
    /// Loads `raw`, expanding tagged seeds with a [`StaticHtmlBrowser`]
    ///
    /// # Example
    ///
    /// ```
    /// use seedline::config::{ConfigLoader, RawConfig};
    /// use serde_json::json;
    ///
    /// let raw = RawConfig::from_value(json!({ "start_urls": ["http://www.foo.bar/"] })).unwrap();
    /// let loader = ConfigLoader::new(raw).unwrap();
    /// assert_eq!(loader.start_urls()[0].url, "http://www.foo.bar/");
    /// assert_eq!(loader.start_urls()[0].page_rank, 0);
    /// ```
    pub fn new(raw: RawConfig) -> ConfigResult<Self> {
        let browser = StaticHtmlBrowser::new(raw.automatic_tagging.menu.clone(), user_agent(&raw));
        Self::with_browser(raw, &browser)
    }

    /// Loads a configuration given as a JSON mapping
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        Self::new(RawConfig::from_value(value)?)
    }

    /// Loads a `.json` or `.toml` configuration file
    ///
    /// Unlike [`load_config`](crate::config::load_config) this leaves
    /// `config_hash` unset.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        Self::new(read_raw_config(path)?)
    }

    /// Loads `raw`, expanding tagged seeds with sessions from `browser`
    ///
    /// At most one session is opened per load, right before the first
    /// expansion, and it is closed before this function returns whether or
    /// not the load succeeds.
    pub fn with_browser(raw: RawConfig, browser: &dyn Browser) -> ConfigResult<Self> {
        let stop_patterns = validate(&raw)?;

        let entries: &[Value] = match raw.start_urls.as_ref() {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        };
        let seeds = normalize_all(entries, raw.automatic_tagging.enabled)?;
        tracing::debug!("Normalized {} seed entries", seeds.len());

        let mut start_urls = expand_seeds(seeds, &raw, browser)?;
        if raw.automatic_tagging.dedupe {
            start_urls = dedupe_seeds(start_urls);
        }
        if start_urls.is_empty() {
            return Err(ConfigShapeError::EmptyCollection {
                field: "start_urls",
            }
            .into());
        }

        let config = finalize(raw, start_urls, stop_patterns);
        tracing::info!(
            "Configuration loaded: {} start URLs, {} allowed domains",
            config.start_urls.len(),
            config.allowed_domains.len()
        );
        Ok(Self { config })
    }

    /// The finalized seed list, in crawl order
    pub fn start_urls(&self) -> &[SeedRecord] {
        &self.config.start_urls
    }

    pub fn config(&self) -> &NormalizedConfig {
        &self.config
    }

    pub fn into_config(self) -> NormalizedConfig {
        self.config
    }
}

impl NormalizedConfig {
    /// Checks whether `url` lies inside `allowed_domains`
    ///
    /// An empty `allowed_domains` list allows everything.
    pub fn is_allowed(&self, url: &str) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        domain_of(url).is_some_and(|domain| {
            self.allowed_domains
                .iter()
                .any(|pattern| matches_wildcard(pattern, &domain))
        })
    }

    /// Checks whether `url` matches any `stop_urls` pattern
    pub fn is_stopped(&self, url: &str) -> bool {
        self.stop_patterns.iter().any(|p| p.is_match(url))
    }
}

/// Runs the expander over tagged seeds, sharing one scoped browser session
fn expand_seeds(
    seeds: Vec<NormalizedSeed>,
    raw: &RawConfig,
    browser: &dyn Browser,
) -> ConfigResult<Vec<SeedRecord>> {
    let expander = AutomaticTagExpander::new(raw.settle_delay());
    let policy = raw.automatic_tagging.on_error;
    let mut session: Option<ScopedSession> = None;
    let mut start_urls = Vec::with_capacity(seeds.len());

    for seed in seeds {
        if !seed.automatic_tagging {
            start_urls.push(seed.record);
            continue;
        }

        let result = open_session(&mut session, browser, &seed.record.url)
            .and_then(|session| expander.expand(&seed.record, &mut **session));

        match result {
            Ok(expanded) => start_urls.extend(expanded),
            Err(e) if policy == ExpansionPolicy::Skip => {
                tracing::warn!("Skipping seed {}: {}", e.url(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(session) = session {
        if let Err(e) = session.close() {
            tracing::warn!("Browser session did not close cleanly: {}", e);
        }
    }

    Ok(start_urls)
}

fn open_session<'a>(
    slot: &'a mut Option<ScopedSession>,
    browser: &dyn Browser,
    url: &str,
) -> Result<&'a mut ScopedSession, ExpansionError> {
    let session = match slot.take() {
        Some(session) => session,
        None => ScopedSession::open(browser).map_err(|source| ExpansionError::Browser {
            url: url.to_string(),
            source,
        })?,
    };
    Ok(slot.insert(session))
}

/// Keeps the first seed for each URL
fn dedupe_seeds(seeds: Vec<SeedRecord>) -> Vec<SeedRecord> {
    let before = seeds.len();
    let mut seen = HashSet::new();
    let seeds: Vec<SeedRecord> = seeds
        .into_iter()
        .filter(|seed| seen.insert(seed.url.clone()))
        .collect();

    if seeds.len() < before {
        tracing::debug!("Removed {} duplicate start URLs", before - seeds.len());
    }
    seeds
}

/// Derives the remaining options and assembles the normalized configuration
fn finalize(
    raw: RawConfig,
    start_urls: Vec<SeedRecord>,
    stop_patterns: Vec<Regex>,
) -> NormalizedConfig {
    let stop_urls = stop_patterns
        .iter()
        .map(|pattern| pattern.as_str().to_string())
        .collect();

    let allowed_domains = match raw.allowed_domains.clone() {
        Some(domains) => domains,
        None => derive_allowed_domains(&start_urls),
    };

    NormalizedConfig {
        user_agent: user_agent(&raw),
        js_wait: raw
            .js_wait
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(Duration::ZERO),
        js_render: raw.js_render,
        selectors: normalize_selectors(raw.selectors),
        index_name: raw.index_name,
        start_urls,
        allowed_domains,
        stop_urls,
        config_hash: None,
        stop_patterns,
    }
}

fn user_agent(raw: &RawConfig) -> String {
    raw.user_agent
        .clone()
        .unwrap_or_else(|| format!("seedline/{}", env!("CARGO_PKG_VERSION")))
}

/// Hosts of the seeds, first occurrence order
fn derive_allowed_domains(seeds: &[SeedRecord]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for domain in seeds.iter().filter_map(|seed| domain_of(&seed.url)) {
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}

/// A bare selector set (one with `lvl0` at the top) becomes the default set
fn normalize_selectors(selectors: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    if !selectors.contains_key("lvl0") {
        return selectors;
    }
    let set: serde_json::Map<String, Value> = selectors.into_iter().collect();
    BTreeMap::from([(DEFAULT_SELECTORS_KEY.to_string(), Value::Object(set))])
}
