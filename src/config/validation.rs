use crate::config::types::{MenuSelectors, RawConfig};
use crate::ConfigShapeError;
use regex::Regex;
use scraper::Selector;
use serde_json::Value;
use std::time::Duration;

/// Upper bound for any wait between navigation and reading the page
const MAX_WAIT: Duration = Duration::from_secs(60);

/// Validates the entire raw configuration
///
/// # Returns
///
/// * `Ok(Vec<Regex>)` - The compiled `stop_urls` patterns, in input order
/// * `Err(ConfigShapeError)` - The first shape problem found
pub fn validate(config: &RawConfig) -> Result<Vec<Regex>, ConfigShapeError> {
    validate_start_urls(config.start_urls.as_ref())?;
    let stop_patterns = compile_stop_urls(config.stop_urls.as_ref())?;
    validate_js_wait(config.js_wait)?;
    validate_settle_delay(config)?;
    if tagging_requested(config) {
        validate_menu_selectors(&config.automatic_tagging.menu)?;
    }
    Ok(stop_patterns)
}

/// Validates the presence and shape of `start_urls`
///
/// A single URL must still be wrapped in a one-element list; a bare string is
/// rejected rather than iterated.
fn validate_start_urls(start_urls: Option<&Value>) -> Result<(), ConfigShapeError> {
    let value = match start_urls {
        None | Some(Value::Null) => {
            return Err(ConfigShapeError::MissingField {
                field: "start_urls",
            })
        }
        Some(value) => value,
    };

    let entries = value.as_array().ok_or(ConfigShapeError::WrongType {
        field: "start_urls",
        expected: "list",
        found: json_type_name(value),
    })?;

    if entries.is_empty() {
        return Err(ConfigShapeError::EmptyCollection {
            field: "start_urls",
        });
    }

    Ok(())
}

/// Compiles `stop_urls`, which must be a list of regular expressions
fn compile_stop_urls(stop_urls: Option<&Value>) -> Result<Vec<Regex>, ConfigShapeError> {
    let value = match stop_urls {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value) => value,
    };

    let entries = value.as_array().ok_or(ConfigShapeError::WrongType {
        field: "stop_urls",
        expected: "list",
        found: json_type_name(value),
    })?;

    entries
        .iter()
        .map(|entry| {
            let pattern = entry.as_str().ok_or(ConfigShapeError::WrongType {
                field: "stop_urls",
                expected: "list of strings",
                found: json_type_name(entry),
            })?;

            Regex::new(pattern).map_err(|e| ConfigShapeError::InvalidValue {
                field: "stop_urls",
                message: format!("'{}' is not a valid pattern: {}", pattern, e),
            })
        })
        .collect()
}

fn validate_js_wait(js_wait: Option<f64>) -> Result<(), ConfigShapeError> {
    let Some(secs) = js_wait else {
        return Ok(());
    };

    match Duration::try_from_secs_f64(secs) {
        Ok(wait) if wait <= MAX_WAIT => Ok(()),
        _ => Err(ConfigShapeError::InvalidValue {
            field: "js_wait",
            message: format!(
                "must be between 0 and {} seconds, got {}",
                MAX_WAIT.as_secs(),
                secs
            ),
        }),
    }
}

/// Bounds the resolved settling delay, whichever option it comes from
fn validate_settle_delay(config: &RawConfig) -> Result<(), ConfigShapeError> {
    let delay = config.settle_delay();
    if delay <= MAX_WAIT {
        return Ok(());
    }

    let field = if config.automatic_tagging.settle_delay_ms.is_some() {
        "automatic_tagging.settle_delay_ms"
    } else {
        "js_wait"
    };
    Err(ConfigShapeError::InvalidValue {
        field,
        message: format!(
            "settling delay must be <= {}ms, got {}ms",
            MAX_WAIT.as_millis(),
            delay.as_millis()
        ),
    })
}

/// True when the global switch or any seed record asks for automatic tagging
fn tagging_requested(config: &RawConfig) -> bool {
    if config.automatic_tagging.enabled {
        return true;
    }
    config
        .start_urls
        .as_ref()
        .and_then(Value::as_array)
        .is_some_and(|entries| {
            entries
                .iter()
                .any(|entry| entry.get("automatic_tagging") == Some(&Value::Bool(true)))
        })
}

fn validate_menu_selectors(menu: &MenuSelectors) -> Result<(), ConfigShapeError> {
    let selectors = [
        (
            "automatic_tagging.menu.section_selector",
            &menu.section_selector,
        ),
        ("automatic_tagging.menu.link_selector", &menu.link_selector),
    ];

    for (field, selector) in selectors {
        Selector::parse(selector).map_err(|e| ConfigShapeError::InvalidValue {
            field,
            message: format!("'{}' is not a valid CSS selector: {:?}", selector, e),
        })?;
    }
    Ok(())
}

/// Names a JSON value's type for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "record",
    }
}
