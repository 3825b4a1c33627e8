use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Selectors key used for expanded seeds that carry no key of their own
pub const DEFAULT_SELECTORS_KEY: &str = "default";

/// Settling delay applied when neither `settle_delay_ms` nor `js_wait` is set
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Crawl configuration as supplied by the user, before validation
///
/// `start_urls` and `stop_urls` are kept as raw JSON values so the validator
/// can report shape problems precisely instead of surfacing a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub start_urls: Option<Value>,

    /// Name of the search index the crawl feeds
    #[serde(default)]
    pub index_name: Option<String>,

    /// Domain patterns the crawler may visit (e.g. "example.com" or "*.example.com")
    #[serde(default)]
    pub allowed_domains: Option<Vec<String>>,

    /// Regular expressions for URLs the crawler must not follow
    #[serde(default)]
    pub stop_urls: Option<Value>,

    /// Extraction strategies keyed by selectors key
    #[serde(default)]
    pub selectors: BTreeMap<String, Value>,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Whether pages need JavaScript rendering downstream
    #[serde(default)]
    pub js_render: bool,

    /// Seconds to wait for client-side rendering
    #[serde(default)]
    pub js_wait: Option<f64>,

    #[serde(default)]
    pub automatic_tagging: AutomaticTaggingConfig,
}

impl RawConfig {
    /// Builds a raw configuration from a JSON mapping
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Settling delay between navigation and reading the navigation menu
    pub fn settle_delay(&self) -> Duration {
        if let Some(ms) = self.automatic_tagging.settle_delay_ms {
            return Duration::from_millis(ms);
        }
        self.js_wait
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(DEFAULT_SETTLE_DELAY)
    }
}

/// Process-wide automatic tagging options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomaticTaggingConfig {
    /// Expand every seed that does not opt out explicitly
    #[serde(default)]
    pub enabled: bool,

    /// Milliseconds to wait after navigation before reading the menu
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,

    #[serde(default)]
    pub on_error: ExpansionPolicy,

    /// Drop later duplicate URLs from the final seed list
    #[serde(default)]
    pub dedupe: bool,

    #[serde(default)]
    pub menu: MenuSelectors,
}

/// What the loader does when a seed fails to expand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionPolicy {
    /// Abort the whole load
    #[default]
    Fail,
    /// Log and drop the failing seed
    Skip,
}

/// CSS selectors describing a navigation menu in server-rendered HTML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuSelectors {
    /// Matches one menu section
    #[serde(default = "default_section_selector")]
    pub section_selector: String,

    /// Matches the links inside a section
    #[serde(default = "default_link_selector")]
    pub link_selector: String,

    /// Section attribute holding the section tag
    #[serde(default = "default_tag_attribute")]
    pub tag_attribute: String,

    /// Section attribute holding the selectors key
    #[serde(default = "default_selectors_key_attribute")]
    pub selectors_key_attribute: String,
}

fn default_section_selector() -> String {
    "nav [data-tag]".to_string()
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_tag_attribute() -> String {
    "data-tag".to_string()
}

fn default_selectors_key_attribute() -> String {
    "data-selectors-key".to_string()
}

impl Default for MenuSelectors {
    fn default() -> Self {
        Self {
            section_selector: default_section_selector(),
            link_selector: default_link_selector(),
            tag_attribute: default_tag_attribute(),
            selectors_key_attribute: default_selectors_key_attribute(),
        }
    }
}

/// A `start_urls` entry, resolved once from its raw JSON form
#[derive(Debug, Clone, PartialEq)]
pub enum RawSeed {
    /// A bare URL string
    Url(String),
    /// A record with optional metadata
    Record(RawSeedRecord),
}

/// Record form of a `start_urls` entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSeedRecord {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub page_rank: Option<i64>,

    #[serde(default)]
    pub selectors_key: Option<String>,

    /// Overrides the process-wide automatic tagging switch for this seed
    #[serde(default)]
    pub automatic_tagging: Option<bool>,
}

/// Canonical seed consumed by the crawler and the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    pub url: String,
    pub tags: Vec<String>,
    pub page_rank: i64,
    pub selectors_key: Option<String>,
}

impl SeedRecord {
    /// Creates a seed with default tags, rank and selectors key
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tags: Vec::new(),
            page_rank: 0,
            selectors_key: None,
        }
    }
}

/// Fully validated configuration handed to the crawler
#[derive(Debug, Clone)]
pub struct NormalizedConfig {
    /// Seeds in crawl order, never empty
    pub start_urls: Vec<SeedRecord>,
    pub index_name: Option<String>,
    pub allowed_domains: Vec<String>,
    pub stop_urls: Vec<String>,
    pub selectors: BTreeMap<String, Value>,
    pub user_agent: String,
    pub js_render: bool,
    pub js_wait: Duration,
    /// SHA-256 of the file the configuration was loaded from
    pub config_hash: Option<String>,
    pub(crate) stop_patterns: Vec<Regex>,
}
