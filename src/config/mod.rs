//! Configuration module for Seedline
//!
//! Validates a raw crawl configuration, normalizes its `start_urls` and
//! expands seeds flagged for automatic tagging.
//!
//! # Example
//!
//! ```no_run
//! use seedline::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docs.json")).unwrap();
//! for seed in &config.start_urls {
//!     println!("{} {:?}", seed.url, seed.tags);
//! }
//! ```

mod loader;
mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{
    AutomaticTaggingConfig, ExpansionPolicy, MenuSelectors, NormalizedConfig, RawConfig, RawSeed,
    RawSeedRecord, SeedRecord, DEFAULT_SELECTORS_KEY, DEFAULT_SETTLE_DELAY,
};

pub use loader::ConfigLoader;
pub use parser::{compute_config_hash, load_config, load_config_with_browser, read_raw_config};
pub use seeds::{normalize, normalize_all, NormalizedSeed};
pub use validation::validate;
