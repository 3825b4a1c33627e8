use crate::browser::Browser;
use crate::config::loader::ConfigLoader;
use crate::config::types::{NormalizedConfig, RawConfig};
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, validates and normalizes a configuration file
///
/// The format follows the file extension: `.json` or `.toml`. Seeds flagged
/// for automatic tagging are expanded with the built-in static HTML browser.
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Returns
///
/// * `Ok(NormalizedConfig)` - Normalized configuration, with `config_hash` set
/// * `Err(ConfigError)` - Failed to read, parse, validate or expand
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use seedline::config::load_config;
///
/// let config = load_config(Path::new("docs.json")).unwrap();
/// println!("Seeds: {}", config.start_urls.len());
/// ```
pub fn load_config(path: &Path) -> ConfigResult<NormalizedConfig> {
    let raw = read_raw_config(path)?;
    let config = ConfigLoader::new(raw)?.into_config();
    with_hash(config, path)
}

/// Like [`load_config`], expanding tagged seeds with `browser`
pub fn load_config_with_browser(
    path: &Path,
    browser: &dyn Browser,
) -> ConfigResult<NormalizedConfig> {
    let raw = read_raw_config(path)?;
    let config = ConfigLoader::with_browser(raw, browser)?.into_config();
    with_hash(config, path)
}

fn with_hash(mut config: NormalizedConfig, path: &Path) -> ConfigResult<NormalizedConfig> {
    config.config_hash = Some(compute_config_hash(path)?);
    Ok(config)
}

/// Reads a configuration file without validating it
pub fn read_raw_config(path: &Path) -> ConfigResult<RawConfig> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let content = std::fs::read_to_string(path)?;
    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to detect configuration changes between crawl runs.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}
