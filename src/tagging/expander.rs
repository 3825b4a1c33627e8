use crate::browser::{BrowserSession, NavigationEntry};
use crate::config::{SeedRecord, DEFAULT_SELECTORS_KEY};
use crate::ExpansionError;
use std::time::Duration;

/// Expands seeds by reading the navigation menu of their rendered page
#[derive(Debug, Clone)]
pub struct AutomaticTagExpander {
    settle_delay: Duration,
}

impl AutomaticTagExpander {
    /// Creates an expander that waits `settle_delay` after each navigation
    ///
    /// The wait is a fixed sleep, not a readiness signal: a page that renders
    /// its menu slower than the delay yields an incomplete menu.
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Replaces `seed` with one seed per navigation entry found at its URL
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized seed to expand
    /// * `session` - An open browser session; the caller owns its lifecycle
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SeedRecord>)` - One record per menu link, in menu order,
    ///   duplicates included
    /// * `Err(ExpansionError)` - The page could not be rendered or read, its
    ///   menu was empty, or a menu entry had a blank URL
    pub fn expand(
        &self,
        seed: &SeedRecord,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<SeedRecord>, ExpansionError> {
        let browser_error = |source| ExpansionError::Browser {
            url: seed.url.clone(),
            source,
        };

        tracing::debug!("Expanding {} via its navigation menu", seed.url);
        session.navigate(&seed.url).map_err(browser_error)?;
        session.wait(self.settle_delay);
        let entries = session.read_navigation_structure().map_err(browser_error)?;

        if entries.is_empty() {
            return Err(ExpansionError::EmptyNavigation {
                url: seed.url.clone(),
            });
        }
        if entries.iter().any(|entry| entry.url.trim().is_empty()) {
            return Err(ExpansionError::EmptyEntryUrl {
                url: seed.url.clone(),
            });
        }

        let records: Vec<SeedRecord> = entries
            .into_iter()
            .map(|entry| derive_seed(seed, entry))
            .collect();

        tracing::info!("Expanded {} into {} seeds", seed.url, records.len());
        Ok(records)
    }
}

fn derive_seed(seed: &SeedRecord, entry: NavigationEntry) -> SeedRecord {
    let selectors_key = entry
        .selectors_key
        .or_else(|| seed.selectors_key.clone())
        .unwrap_or_else(|| DEFAULT_SELECTORS_KEY.to_string());

    tracing::debug!("  {} [{}]", entry.url, selectors_key);
    SeedRecord {
        url: entry.url,
        tags: merge_tags(&seed.tags, &entry.tags),
        page_rank: seed.page_rank,
        selectors_key: Some(selectors_key),
    }
}

/// Order-preserving union: `base` as given, then each new tag not yet present
pub fn merge_tags(base: &[String], extra: &[String]) -> Vec<String> {
    let mut tags = base.to_vec();
    for tag in extra {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
