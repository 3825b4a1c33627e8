//! Seedline: start-url normalization for a documentation crawler
//!
//! This crate turns a user-supplied crawl configuration into a validated,
//! fully-normalized seed list, expanding seeds flagged for automatic tagging
//! by reading the navigation menu of the rendered page.

pub mod browser;
pub mod config;
pub mod tagging;
pub mod url;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Shape(#[from] ConfigShapeError),

    #[error(transparent)]
    Seed(#[from] SeedShapeError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),
}

/// Structural problems with the configuration as a whole
#[derive(Debug, Error, PartialEq)]
pub enum ConfigShapeError {
    #[error("{field} is not defined")]
    MissingField { field: &'static str },

    #[error("{field} should be {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{field} should have at least one element")]
    EmptyCollection { field: &'static str },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Problems with a single `start_urls` entry
#[derive(Debug, Error, PartialEq)]
pub enum SeedShapeError {
    #[error("start_urls[{index}] should have a 'url' parameter")]
    MissingUrl { index: usize },

    #[error("start_urls[{index}] has an empty 'url'")]
    EmptyUrl { index: usize },

    #[error("start_urls[{index}] should be a string or a record, got {found}")]
    InvalidEntry { index: usize, found: &'static str },

    #[error("start_urls[{index}].{field} is invalid: {message}")]
    InvalidField {
        index: usize,
        field: &'static str,
        message: String,
    },
}

/// Errors raised by a browser backend
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to open browser session: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Failed to read rendered page: {0}")]
    Render(String),

    #[error("Failed to close browser session: {0}")]
    Close(String),
}

/// Errors raised while expanding a seed through its navigation menu
#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("Browser session error while expanding {url}: {source}")]
    Browser {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("No navigation entries found at {url}")]
    EmptyNavigation { url: String },

    #[error("Navigation entry without a URL found at {url}")]
    EmptyEntryUrl { url: String },
}

impl ExpansionError {
    /// The seed URL whose expansion failed
    pub fn url(&self) -> &str {
        match self {
            Self::Browser { url, .. }
            | Self::EmptyNavigation { url }
            | Self::EmptyEntryUrl { url } => url,
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

// Re-export commonly used types
pub use browser::{Browser, BrowserSession, NavigationEntry, StaticHtmlBrowser};
pub use config::{load_config, ConfigLoader, NormalizedConfig, RawConfig, SeedRecord};
pub use tagging::AutomaticTagExpander;
